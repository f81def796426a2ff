use ai_page_studio::cli;

fn main() -> anyhow::Result<()> {
    cli::run()
}
