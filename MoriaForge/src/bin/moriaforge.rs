fn main() -> anyhow::Result<()> {
    moriaforge::cli::run_cli()
}
