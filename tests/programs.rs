//! End-to-end runs of small Hack programs on a fully wired computer.

use hack::{Computer, CpuError, MemoryError, RunConfig, Runner, StopReason, Word};

const ADD: &str = include_str!("../testdata/add.hack");
const MULT: &str = include_str!("../testdata/mult.hack");

fn computer(source: &str) -> Computer {
    let program = hack::parse_hack(source).unwrap();
    Computer::with_program(&program).unwrap()
}

fn mult(x: Word, y: Word) -> Computer {
    let mut computer = computer(MULT);
    computer.write_ram(0, x).unwrap();
    computer.write_ram(1, y).unwrap();
    computer
}

fn unpaced(max_steps: u64) -> Runner {
    Runner::new(RunConfig {
        max_steps: Some(max_steps),
        paced: false,
        ..RunConfig::default()
    })
}

#[test]
fn addition() {
    let mut computer = computer(ADD);

    assert_eq!(computer.run_batch(6), Ok(6));

    assert_eq!(computer.read_ram(0), Ok(5));
    assert_eq!(computer.registers().pc, 6);
    assert!(computer.is_halted());
}

#[test]
fn multiplication() {
    let mut computer = mult(5, 5);

    computer.run_batch(100).unwrap();

    assert_eq!(computer.read_ram(2), Ok(25));
    assert_eq!(computer.registers().pc, 18);
}

#[test]
fn multiplication_halts_through_runner() {
    let mut computer = mult(5, 5);

    let summary = unpaced(10_000).run(&mut computer).unwrap();

    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(summary.steps, 70);
    assert_eq!(computer.read_ram(2), Ok(25));
}

#[test]
fn multiplication_wraps_at_16_bits() {
    let mut computer = mult(300, 300);

    let summary = unpaced(100_000).run(&mut computer).unwrap();

    assert_eq!(summary.reason, StopReason::Halted);
    assert_eq!(computer.read_ram(2), Ok(90_000u32 as u16 as Word));
}

#[test]
fn runner_stops_at_step_limit() {
    let mut computer = mult(5, 5);

    let summary = unpaced(10).run(&mut computer).unwrap();

    assert_eq!(summary.reason, StopReason::StepLimit);
    assert_eq!(summary.steps, 10);
    assert_eq!(computer.cpu().cycles, 10);
}

#[test]
fn bad_instruction_leaves_pc() {
    // @1, then a compute word whose comp bits match no ALU operation.
    let mut computer = computer("0000000000000001\n1110000001000000\n");
    computer.step().unwrap();

    let err = computer.step().unwrap_err();

    assert!(err.is_bad_instruction());
    assert_eq!(err.instruction(), Some(0xE040));
    assert_eq!(computer.registers().pc, 1);
    assert_eq!(computer.registers().a, 1);
}

#[test]
fn unbounded_batch_after_stepping() {
    // @1, D=A, then an undefined comp.
    let mut computer = computer("0000000000000001\n1110110000010000\n1110000001000000\n");
    computer.step().unwrap();

    let err = computer.run_batch(u64::MAX).unwrap_err();

    assert!(err.is_bad_instruction());
    assert_eq!(computer.cpu().cycles, 2);
    assert_eq!(computer.registers().d, 1);
}

#[test]
fn out_of_range_access() {
    // @0x6001, D=M
    let mut computer = computer("0110000000000001\n1111110000010000\n");
    computer.step().unwrap();

    let err = computer.step().unwrap_err();

    assert!(err.is_bad_address());
    assert_eq!(
        err,
        CpuError::Memory { instruction: 0xFC10, source: MemoryError::BadAddress(0x6001) }
    );
    assert_eq!(computer.registers().pc, 1);
}

#[test]
fn keyboard_write_is_rejected() {
    // @KBD, M=1
    let mut computer = computer("0110000000000000\n1110111111001000\n");
    computer.step().unwrap();

    let err = computer.step().unwrap_err();

    assert!(err.is_bad_address());
    assert_eq!(computer.read_ram(0x6000), Ok(0));
}

#[test]
fn program_reads_keyboard() {
    // @KBD, D=M, @0, M=D
    let mut computer = computer(
        "0110000000000000\n1111110000010000\n0000000000000000\n1110001100001000\n",
    );
    assert!(computer.key_down("ArrowUp"));

    computer.run_batch(4).unwrap();

    assert_eq!(computer.read_ram(0), Ok(131));
}

#[test]
fn program_draws_on_screen() {
    // @SCREEN, M=-1: the first sixteen pixels of row 0 light up.
    let mut computer = computer("0100000000000000\n1110111010001000\n");

    computer.run_batch(2).unwrap();

    assert!((0..16).all(|x| computer.screen().pixel(x, 0)));
    assert!(!computer.screen().pixel(16, 0));
    assert!(!computer.screen().pixel(0, 1));
}

#[test]
fn runs_are_deterministic() {
    let run = || {
        let mut computer = mult(7, 9);
        computer.run_batch(200).unwrap();
        computer.snapshot()
    };

    let first = run();
    let second = run();

    assert_eq!(first, second);
    assert!(first.ram.contains(&(2, 63)));
}

#[test]
fn reset_keeps_registers_and_memory() {
    let mut computer = computer(ADD);
    computer.run_batch(6).unwrap();

    computer.reset();

    assert_eq!(computer.registers().pc, 0);
    assert_eq!(computer.registers().d, 5);
    assert_eq!(computer.read_ram(0), Ok(5));
}

#[test]
fn load_from_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/add.hack");
    let mut computer = Computer::new();

    computer.load_file(path).unwrap();
    computer.run_batch(6).unwrap();

    assert_eq!(computer.read_ram(0), Ok(5));
}

#[test]
fn missing_file_is_an_error() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/missing.hack");
    let mut computer = Computer::new();

    assert!(matches!(computer.load_file(path), Err(hack::ProgramError::IoError(_))));
}
