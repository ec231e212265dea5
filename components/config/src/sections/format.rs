use crate::util;

crate::section! {
    #[serde(default)]
    pub struct Format {
        /// Wrap usernames in Unicode directional isolates when rendering `username#discriminator`,
        /// so right-to-left names cannot visually swallow the discriminator
        pub bidirectional_usernames: bool = true => "FORMAT_BIDI_USERNAMES" | util::parse_boolean[true],
    }
}
