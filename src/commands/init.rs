use anyhow::Context;
use anyhow::Result;

use crate::App;
use crate::clients::runner::CommandRunner;
use crate::config::Preference;
use crate::error::Error;
use crate::prompt::Prompt;

impl<R: CommandRunner, P: Prompt> App<R, P> {
    /// Ask for every preference again, offering the current values as
    /// defaults.
    pub fn cmd_init(&mut self, stdout: &mut impl std::io::Write) -> Result<()> {
        for preference in Preference::ALL {
            self.ask_preference(preference)?;
        }
        writeln!(
            stdout,
            "Configuration saved to {}",
            self.config.path().display()
        )?;
        Ok(())
    }

    /// Ask for the preferences that are still empty. Each answer is saved as
    /// soon as it is given, so an abort part way through keeps earlier
    /// answers.
    pub fn ensure_preferences(&mut self) -> Result<()> {
        for preference in self.config.missing() {
            self.ask_preference(preference)?;
        }
        Ok(())
    }

    fn ask_preference(&mut self, preference: Preference) -> Result<()> {
        let current = self.config.get(preference).to_string();
        let Some(value) = self.prompt.ask_text(preference.prompt(), &current) else {
            return Err(Error::MissingInput(preference.label()).into());
        };
        self.config.set(preference, value);
        self.config
            .save()
            .with_context(|| format!("Failed to save {}", self.config.path().display()))?;
        Ok(())
    }
}
