use clap::Parser;

use crate::analysis::DEFAULT_MODEL;
use crate::llm::real::DEFAULT_API_BASE;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the carelog database
    #[arg(long, env = "CARELOG_DB", default_value = "data/carelog.db")]
    pub db: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Gemini API key for shift analysis
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub gemini_api_base: String,

    /// Model used for shift analysis and summaries
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}
