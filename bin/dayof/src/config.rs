pub mod sections {
    use std::{net::SocketAddr, path::PathBuf};

    use schema::Duration;

    config::section! {
        #[serde(default)]
        pub struct Invites {
            /// Days until an unaccepted invite expires
            pub expiry_days: u32 = 7 => "DAYOF_INVITE_EXPIRY_DAYS" | config::util::parse[7u32],
        }

        impl Extra {
            fn configure(&mut self) {
                if self.expiry_days == 0 {
                    log::warn!("Invite expiry of 0 days would expire every invite immediately, using 7");
                    self.expiry_days = 7;
                }
            }
        }
    }

    impl Invites {
        pub fn expiry(&self) -> Duration {
            Duration::days(self.expiry_days as i64)
        }
    }

    config::section! {
        #[serde(default)]
        pub struct Tasks {
            /// Hour of the day (UTC) at which expired invites are swept
            pub cleanup_hour: u8 = 3 => "DAYOF_CLEANUP_HOUR" | config::util::parse[3u8],
        }

        impl Extra {
            fn configure(&mut self) {
                if self.cleanup_hour > 23 {
                    log::warn!("Invalid cleanup hour {}, using 3", self.cleanup_hour);
                    self.cleanup_hour = 3;
                }
            }
        }
    }

    config::section! {
        #[serde(default)]
        pub struct Paths {
            /// Where to write logfiles to. Automatically rotated.
            ///
            /// Empty to log to stdout only.
            pub log_dir: PathBuf = "./logs".into() => "DAYOF_LOG_DIR",
        }
    }

    config::section! {
        #[serde(default)]
        pub struct Rpc {
            /// Bind address for the line-delimited JSON RPC listener
            pub bind: SocketAddr = SocketAddr::from(([127, 0, 0, 1], 7070)) => "DAYOF_RPC_BIND" | config::util::parse_address,
        }
    }

    config::section! {
        #[serde(default)]
        pub struct Email {
            /// Sender address on outgoing invite emails
            pub from: String = "invites@dayof.app".to_owned() => "DAYOF_EMAIL_FROM",

            /// Base URL of the app, invite links are `{app_url}/invite/{token}`
            pub app_url: String = "https://dayof.app".to_owned() => "DAYOF_APP_URL",
        }
    }
}

config::config! {
    pub struct Config {
        /// Invite quotas and expiry
        invites: sections::Invites,
        /// Scheduled jobs
        tasks: sections::Tasks,
        /// Filesystem paths
        paths: sections::Paths,
        /// RPC listener
        rpc: sections::Rpc,
        /// Outgoing email
        email: sections::Email,
    }
}
