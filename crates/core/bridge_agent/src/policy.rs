use onem2m_api::http_proxy::ButtonState;

/// Value posted into the light's DATA container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    On,
    Off,
}

impl LightCommand {
    pub fn value(self) -> &'static str {
        match self {
            LightCommand::On => "ON",
            LightCommand::Off => "OFF",
        }
    }
}

/// Map the retrieved button state to a light actuation, if any.
///
/// Anything but an exact `ON`/`OFF` leaves the light untouched.
pub fn decide(state: &ButtonState) -> Option<LightCommand> {
    match state {
        ButtonState::On => Some(LightCommand::On),
        ButtonState::Off => Some(LightCommand::Off),
        ButtonState::Unknown(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onem2m_api::http_proxy::UnknownStateReason;
    use test_case::test_case;

    #[test_case(ButtonState::On, Some(LightCommand::On))]
    #[test_case(ButtonState::Off, Some(LightCommand::Off))]
    fn exact_button_states_drive_the_light(state: ButtonState, expected: Option<LightCommand>) {
        assert_eq!(decide(&state), expected);
    }

    #[test_case("" ; "empty string")]
    #[test_case("   " ; "whitespace only")]
    #[test_case("on")]
    #[test_case("ON OFF")]
    #[test_case("anything else")]
    fn unrecognized_values_leave_the_light_untouched(value: &str) {
        let state = ButtonState::from_retrieved_text(value);

        assert_eq!(decide(&state), None);
    }

    #[test]
    fn retrieval_failures_leave_the_light_untouched() {
        let state = ButtonState::Unknown(UnknownStateReason::RetrieveFailed(
            "HTTP status 503 Service Unavailable".to_owned(),
        ));

        assert_eq!(decide(&state), None);
    }

    #[test]
    fn light_commands_carry_the_wire_value() {
        assert_eq!(LightCommand::On.value(), "ON");
        assert_eq!(LightCommand::Off.value(), "OFF");
    }
}
