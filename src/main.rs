use rusty_mailbook::prelude::run_app;
use std::process::exit;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    if let Err(e) = run_app().await {
        eprintln!("{}", e);
        exit(1);
    }
}
