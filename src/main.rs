use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use github_velocity::cli::{Cli, normalize};
use github_velocity::github::token::get_github_token;
use github_velocity::{render, run, util};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: credential (flag, then discovery)
  let token = cfg.token.clone().or_else(get_github_token);

  if token.is_none() {
    warn!("no GitHub token; requests are unauthenticated. Set GITHUB_TOKEN or run: gh auth login");
  }

  // Phase 3: fetch + compute
  let result = run::run_with_token(&cfg.run_params(), Some(&cfg.api_url), token, cfg.now)?;

  // Phase 4: render
  let text = if cfg.json {
    render::render_json(&result)?
  } else {
    render::render_text(&result)
  };

  util::write_output(&cfg.out, &text)
}
