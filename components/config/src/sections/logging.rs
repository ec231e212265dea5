use std::path::PathBuf;

use crate::util;

crate::section! {
    #[serde(default)]
    pub struct Logging {
        /// Base level filter, one of `error`, `warn`, `info`, `debug`, `trace`
        pub level: String = "info".to_owned() => "LOG_LEVEL",

        /// Directory for daily rolling log files, stdout only if unset
        pub directory: Option<PathBuf> = None => "LOG_DIRECTORY" | util::some_path,
    }
}
