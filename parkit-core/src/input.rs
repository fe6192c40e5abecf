use crate::CoreResult;

/// Source of operator input for the parking workflow.
///
/// The console shell reads these from stdin; the HTTP API answers them from
/// the request body.
pub trait InputReader: Send + Sync {
    /// Menu code for the vehicle category (1 = car, 2 = bike)
    fn read_selection(&self) -> CoreResult<i32>;

    fn read_vehicle_registration(&self) -> CoreResult<String>;
}

/// Input with fixed answers, one request's worth
#[derive(Debug, Clone, Default)]
pub struct FixedInput {
    pub selection: Option<i32>,
    pub registration: Option<String>,
}

impl FixedInput {
    pub fn entry(selection: i32, registration: impl Into<String>) -> Self {
        Self {
            selection: Some(selection),
            registration: Some(registration.into()),
        }
    }

    pub fn exit(registration: impl Into<String>) -> Self {
        Self {
            selection: None,
            registration: Some(registration.into()),
        }
    }
}

impl InputReader for FixedInput {
    fn read_selection(&self) -> CoreResult<i32> {
        self.selection
            .ok_or_else(|| crate::CoreError::InputError("no vehicle type selected".to_string()))
    }

    fn read_vehicle_registration(&self) -> CoreResult<String> {
        self.registration
            .clone()
            .ok_or_else(|| crate::CoreError::InputError("no registration provided".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_input_answers() {
        let input = FixedInput::entry(1, "ABCDEF");
        assert_eq!(input.read_selection().unwrap(), 1);
        assert_eq!(input.read_vehicle_registration().unwrap(), "ABCDEF");

        let input = FixedInput::exit("ABCDEF");
        assert!(input.read_selection().is_err());
    }
}
