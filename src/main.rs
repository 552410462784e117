use job_board::cli::{self, StartupError};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    cli::run().await
}
