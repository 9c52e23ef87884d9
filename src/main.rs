use piccl_service::error::exit_code;
use piccl_service::utils::logging;
use piccl_service::{Config, Invocation, Orchestrator};

#[tokio::main]
async fn main() {
    let invocation = match Invocation::from_args(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(exit_code::UNEXPECTED);
        }
    };

    let config = Config::from_env().with_scripts_dir(invocation.scripts_dir.clone());
    logging::init(config.verbose_logging);

    let code = Orchestrator::new(config, invocation).run().await;
    std::process::exit(code);
}
