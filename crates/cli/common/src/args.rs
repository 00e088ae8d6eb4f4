// Copyright (c) Contributors to the azure-blobstore-resource project.
// SPDX-License-Identifier: Apache-2.0

use tracing_subscriber::prelude::*;

const RESOURCE_LOG: &str = "BLOBSTORE_RESOURCE_LOG";

/// Install the global tracing subscriber.
///
/// All output goes to stderr: stdout belongs to the resource protocol and
/// must carry nothing but the response json.
pub fn configure_logging(verbosity: u8) {
    let mut config = match verbosity {
        0 => std::env::var(RESOURCE_LOG)
            .unwrap_or_else(|_| "blobstore_resource=info,azblob=info,warn".to_string()),
        1 => "blobstore_resource=debug,azblob=debug,info".to_string(),
        2 => "blobstore_resource=trace,azblob=trace,info".to_string(),
        _ => "trace".to_string(),
    };
    if let Ok(overrides) = std::env::var("RUST_LOG") {
        config.push(',');
        config.push_str(&overrides);
    }
    let env_filter = tracing_subscriber::filter::EnvFilter::from(config);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbosity > 1);
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();
}

/// Generate the `main` function for a resource executable.
///
/// The command type must be a `clap::Parser` with a `verbose` count flag
/// and an `async fn run(&mut self) -> miette::Result<i32>`.
#[macro_export]
macro_rules! main {
    ($cmd:ident) => {
        fn main() {
            // because this function exits right away it does not
            // properly handle destruction of data, so the actual logic
            // lives in a separate function/scope
            std::process::exit(main2())
        }
        fn main2() -> i32 {
            let mut opt = <$cmd as clap::Parser>::parse();
            $crate::configure_logging(opt.verbose);

            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Err(err) => {
                    tracing::error!("Failed to establish runtime: {:?}", err);
                    return 1;
                }
                Ok(rt) => rt,
            };
            let result = rt.block_on(opt.run());
            rt.shutdown_timeout(std::time::Duration::from_millis(250));

            $crate::handle_result!(result)
        }
    };
}

#[macro_export]
macro_rules! handle_result {
    ($result:ident) => {{
        match $result {
            Err(err) => {
                tracing::error!("{err:?}");
                1
            }
            Ok(code) => code,
        }
    }};
}
