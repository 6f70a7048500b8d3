fn main() -> anyhow::Result<()> {
    poncho::run_cli()
}
