use mickofont::Result;

use mickofont::cli::{get_config, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(get_config()?).await?;

    Ok(())
}
