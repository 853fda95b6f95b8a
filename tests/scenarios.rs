use std::time::Duration;
use tmsim::{
    Direction, Halt, MachineConfig, MachineDefinition, PresetManager, Status, Step,
    TuringMachine,
};

fn even_binary() -> MachineDefinition {
    PresetManager::get_by_key("evenBinary")
        .unwrap()
        .config
        .to_definition()
        .unwrap()
}

#[test]
fn even_binary_accepts_1010() {
    let mut machine = TuringMachine::new(even_binary(), "1010");

    assert_eq!(machine.step(), Step::Continue);
    let first = &machine.history()[0];
    assert_eq!(first.read_symbol, '1');
    assert_eq!(first.head_position, 0);
    assert_eq!(first.move_direction, Direction::Right);
    assert_eq!(machine.state(), "q0");

    let mut outcome = Step::Continue;
    while outcome == Step::Continue {
        outcome = machine.step();
    }

    assert_eq!(outcome, Step::Halt(Halt::Accept));
    assert_eq!(machine.status(), Status::Accepted);
    // the last symbol checked was the trailing '0', after seeing the blank past it
    let last_two: Vec<char> = machine
        .history()
        .iter()
        .rev()
        .take(2)
        .map(|entry| entry.read_symbol)
        .collect();
    assert_eq!(last_two, vec!['0', 'B']);
}

#[test]
fn even_binary_rejects_1011() {
    let mut machine = TuringMachine::new(even_binary(), "1011");

    assert_eq!(machine.run_steps(100), Step::Halt(Halt::Reject));
    assert_eq!(machine.status(), Status::Rejected);
}

#[test]
fn undefined_pair_rejects_after_one_step() {
    let definition = MachineDefinition::builder()
        .states(["q0", "qAccept", "qReject"])
        .input_alphabet(['0', '1'])
        .rule("q0", '0', "qAccept", '0', Direction::Right)
        .initial_state("q0")
        .accept_state("qAccept")
        .reject_state("qReject")
        .build();
    let mut machine = TuringMachine::new(definition, "1");

    machine.step();

    assert_eq!(machine.status(), Status::Rejected);
    assert_eq!(machine.step_count(), 1);
    assert!(machine.history()[0].is_error);

    machine.step();
    assert_eq!(machine.step_count(), 1);
    assert_eq!(machine.history().len(), 1);
}

#[test]
fn empty_input_is_a_single_blank() {
    let machine = TuringMachine::new(even_binary(), "");

    assert_eq!(machine.tape().symbols(), vec!['B']);
    assert_eq!(machine.head_position(), 0);
    assert_eq!(machine.status(), Status::Ready);
}

#[test]
fn stored_configuration_drives_the_engine() {
    let text = r#"{
        "states": ["q0", "qAccept", "qReject"],
        "inputAlphabet": ["a"],
        "tapeAlphabet": ["a"],
        "transitions": {
            "q0,a": { "nextState": "q0", "writeSymbol": "x", "moveDirection": "R" },
            "q0,_": { "nextState": "qAccept", "writeSymbol": "_", "moveDirection": "S" }
        },
        "initialState": "q0",
        "acceptState": "qAccept",
        "rejectState": "qReject",
        "blankSymbol": "_",
        "inputString": "aaa"
    }"#;
    let config = MachineConfig::from_json(text).unwrap();
    let definition = config.to_definition().unwrap();
    assert_eq!(definition.warnings().len(), 1);

    let mut machine = TuringMachine::new(definition, config.input_string.as_str());
    assert_eq!(machine.run_steps(100), Step::Halt(Halt::Accept));
    assert_eq!(machine.tape().to_string(), "xxx_");

    let snapshot = serde_json::to_value(machine.snapshot()).unwrap();
    assert_eq!(snapshot["status"], "Accepted");
    assert_eq!(snapshot["stepCount"], 4);
    assert_eq!(snapshot["history"][0]["moveDirection"], "R");
}

#[tokio::test]
async fn run_reaches_the_same_verdict_as_stepping() {
    for input in ["", "0", "1", "1010", "1011", "111000"] {
        let mut stepped = TuringMachine::new(even_binary(), input);
        stepped.run_steps(1000);

        let mut timed = TuringMachine::new(even_binary(), input);
        let status = timed.run(Duration::from_millis(1)).await;

        assert_eq!(status, stepped.status(), "input {:?}", input);
        assert_eq!(timed.history(), stepped.history());
    }
}
