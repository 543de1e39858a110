use retarget::{CommandSink, CommandVector, Speed};

/// A [`CommandSink`] that only logs the commands it receives.
#[derive(Debug, Default)]
pub struct DryRunSink {
    commands: u64,
    released: bool,
}

impl DryRunSink {
    /// The number of commands received so far.
    #[must_use]
    pub fn commands(&self) -> u64 {
        self.commands
    }
}

impl CommandSink for DryRunSink {
    fn is_usable(&self) -> bool {
        !self.released
    }

    fn set_angles(&mut self, command: &CommandVector, speed: Speed) -> retarget::Result<()> {
        self.commands += 1;

        let angles = command
            .joints()
            .named()
            .map(|(name, radians)| format!("{name}={radians:.3}"))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(speed = speed.fraction(), "set angles {angles}");

        Ok(())
    }

    fn release_stiffness(&mut self) -> retarget::Result<()> {
        self.released = true;
        tracing::info!(commands = self.commands, "released stiffness");

        Ok(())
    }
}
