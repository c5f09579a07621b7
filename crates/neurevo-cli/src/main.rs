mod command;
mod environment;

fn main() -> anyhow::Result<()> {
    command::run()
}
