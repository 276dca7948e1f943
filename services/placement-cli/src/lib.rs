mod cli;
mod demo;
mod infra;

use placement_engine::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
