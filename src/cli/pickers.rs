use inquire::InquireError;

use crate::error::Result;

/// Request confirmation for a destructive operation
pub fn confirm_action(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    match inquire::Confirm::new(message).with_default(false).prompt() {
        Ok(confirmed) => Ok(confirmed),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_skips_prompt() {
        assert!(confirm_action("Delete?", true).unwrap());
    }
}
