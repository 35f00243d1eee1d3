use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match storyboard_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("storyboard-studio: {err}");
            ExitCode::FAILURE
        }
    }
}
