use clap::Parser;

/// Terminal emulator engine: runs a shell behind a pty and renders its
/// output to this process's own stdout.
#[derive(Parser, Debug)]
#[command(name = "tyrterm", version, about)]
pub struct Cli {
    /// Shell (or other program) to run, with its arguments.
    #[arg(default_value = "/bin/sh")]
    pub shell: String,

    #[arg(trailing_var_arg = true)]
    pub shell_args: Vec<String>,

    /// Initial grid height.
    #[arg(long, default_value_t = 24)]
    pub rows: u16,

    /// Initial grid width.
    #[arg(long, default_value_t = 80)]
    pub cols: u16,
}

impl Cli {
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![self.shell.clone()];
        argv.extend(self.shell_args.iter().cloned());
        argv
    }
}
