mod audio;
mod catalog;
mod config;
mod display;
mod http;
mod keys;
mod metadata;
mod mpris;
mod notify;
mod poller;
mod runtime;
mod shutdown;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
