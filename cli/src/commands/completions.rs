use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

#[derive(Debug, Args)]
pub struct CompletionCommand {
  #[clap(value_enum)]
  shell: Shell,
}

impl CompletionCommand {
  pub fn run(self) -> Result<()> {
    let mut cmd = crate::cli::Args::command();
    let name = cmd.get_name().to_string();

    generate(self.shell, &mut cmd, name, &mut io::stdout());

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use spectral::prelude::*;

  #[test]
  fn test_completions_use_command_name() {
    let mut cmd = crate::cli::Args::command();
    let name = cmd.get_name().to_string();
    let mut out = Vec::new();

    generate(Shell::Bash, &mut cmd, name.clone(), &mut out);

    assert_that(&name).is_equal_to("otp-clock".to_string());
    assert_that(&String::from_utf8(out).unwrap().contains("otp-clock")).is_true();
  }
}
