use crate::util;

crate::section! {
    #[serde(default)]
    pub struct Registry {
        /// Number of lock shards in the shared user table.
        ///
        /// Setting this to 0 will use four shards per CPU thread.
        pub shards: usize = 0 => "USER_REGISTRY_SHARDS" | util::parse[0usize],
    }

    impl Extra {
        fn configure(&mut self) {
            if self.shards == 0 {
                self.shards = 4 * num_cpus::get();

                tracing::info!("Setting user registry shards to {}", self.shards);
            }
        }
    }
}
