use pml_parser::{parse, serialize, ParameterizedIdentifier, PipelineSpecification};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_-]{0,8}"
}

fn parameter() -> impl Strategy<Value = String> {
    prop_oneof![
        name(),
        "[+-]?[0-9]{1,3}(\\.[0-9]{1,3})?",
        "[+-]?\\.[0-9]{1,3}",
    ]
}

fn pident() -> impl Strategy<Value = ParameterizedIdentifier> {
    (name(), prop::collection::vec(parameter(), 0..4))
        .prop_map(|(name, params)| ParameterizedIdentifier::new(name, params))
}

fn specification() -> impl Strategy<Value = PipelineSpecification> {
    (
        prop_oneof![Just("gp".to_string()), Just("navx".to_string()), name()],
        prop_oneof![Just("x".to_string()), Just("y".to_string()), name()],
        pident(),
        prop::collection::vec(pident(), 0..4),
        name(),
    )
        .prop_map(|(device, input, filter, stages, callback)| {
            PipelineSpecification::new(device, input, filter, stages, callback)
        })
}

proptest! {
    #[test]
    fn test_serialize_then_parse_is_identity(specs in prop::collection::vec(specification(), 0..8)) {
        let text = serialize(&specs);
        let parsed = parse(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed, specs);
    }
}

#[test]
fn test_round_trip_of_fixed_documents() {
    let documents = [
        "gamepad1.left_joystick_x :: always |-> deadband(0.5) ->| strafe;",
        "gamepad1.left_joystick_x :: |->| logging;",
        "navx.heading :: sometimes |-> smoothing -> scaling(5,6,7,8) ->| value, :: always |->| log;",
        "gp.x :: always |->| y # trailing comment\n",
        "gp.a :: |->| b, .c :: sometimes(2) |-> invert ->| d, :: |->| e; other.z :: |->| w",
    ];
    for document in documents {
        let first = parse(document).unwrap();
        let second = parse(&serialize(&first)).unwrap();
        assert_eq!(first, second, "document: {document}");
    }
}

#[test]
fn test_serialized_form_is_stable() {
    let specs = parse("navx.heading :: sometimes |-> smoothing -> scaling(5,6,7,8) ->| value, :: always |->| log;").unwrap();
    assert_eq!(
        serialize(&specs),
        "navx.heading :: sometimes |-> smoothing -> scaling(5,6,7,8) ->| value,\n    :: always |->| log;\n"
    );
}
