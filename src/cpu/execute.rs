//! CPU execution engine for the Hack computer.
//!
//! Implements the fetch-decode-execute cycle over an instruction ROM and a
//! data address space, both reached only through the memory traits.

use crate::cpu::decode::{self, DecodeError, Instruction, Source};
use crate::cpu::memory::{MemoryError, ReadMemory, ReadWriteMemory, Word};
use crate::cpu::Registers;
use thiserror::Error;

/// The Hack CPU.
///
/// `P` is the instruction store and `M` the data address space.
#[derive(Clone)]
pub struct Cpu<P, M> {
    /// CPU registers.
    pub regs: Registers,
    /// Instructions executed since construction.
    pub cycles: u64,
    rom: P,
    ram: M,
}

impl<P: ReadMemory, M: ReadWriteMemory> Cpu<P, M> {
    /// Create a CPU with zeroed registers.
    pub fn new(ram: M, rom: P) -> Self {
        Self {
            regs: Registers::new(),
            cycles: 0,
            rom,
            ram,
        }
    }

    /// Swap in a new instruction store and restart at address 0.
    pub fn load(&mut self, rom: P) {
        self.rom = rom;
        self.reset();
    }

    /// Restart execution at address 0.
    ///
    /// A, D and the address space are left untouched.
    pub fn reset(&mut self) {
        self.regs.reset();
        log::debug!("cpu reset (A={}, D={})", self.regs.a, self.regs.d);
    }

    pub fn a(&self) -> Word {
        self.regs.a
    }

    pub fn d(&self) -> Word {
        self.regs.d
    }

    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn rom(&self) -> &P {
        &self.rom
    }

    pub fn rom_mut(&mut self) -> &mut P {
        &mut self.rom
    }

    pub fn ram(&self) -> &M {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut M {
        &mut self.ram
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed. On error PC is not
    /// advanced; the caller decides whether to stop.
    pub fn step(&mut self) -> Result<Instruction, CpuError> {
        // Fetch
        let pc = self.regs.pc;
        let word = self
            .rom
            .read(pc.into())
            .map_err(|source| CpuError::Fetch { pc, source })?;

        // Decode
        let instr = decode::decode(word as u16)?;

        // Execute
        self.execute(word as u16, instr)?;

        self.cycles += 1;
        Ok(instr)
    }

    /// Run for at most `max_cycles` instructions.
    ///
    /// Returns the number of instructions executed. Any batch size is
    /// accepted, including `u64::MAX`.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        for _ in 0..max_cycles {
            self.step()?;
        }

        Ok(max_cycles)
    }

    fn execute(&mut self, word: u16, instr: Instruction) -> Result<(), CpuError> {
        match instr {
            Instruction::Address(value) => {
                self.regs.a = value as Word;
                self.regs.advance_pc();
            }

            Instruction::Compute { source, op, dest, jump } => {
                let memory_error = |e| CpuError::Memory { instruction: word, source: e };

                let x = if source == Source::M && op.reads_x() {
                    self.ram.read(self.regs.a.into()).map_err(memory_error)?
                } else {
                    self.regs.a
                };
                let result = op.apply(self.regs.d, x, self.regs.a);

                // Write-back order is M, A, D: M uses the old A.
                if dest.m {
                    self.ram.write(self.regs.a.into(), result).map_err(memory_error)?;
                }
                if dest.a {
                    self.regs.a = result;
                }
                if dest.d {
                    self.regs.d = result;
                }

                if jump.holds(result) {
                    self.regs.jump_to_a();
                } else {
                    self.regs.advance_pc();
                }
            }
        }

        Ok(())
    }
}

impl<P, M: std::fmt::Debug> std::fmt::Debug for Cpu<P, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .field("ram", &self.ram)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("reading instruction at PC={pc}: {source}")]
    Fetch { pc: u16, source: MemoryError },

    #[error("executing instruction 0x{instruction:04X}: {source}")]
    Memory { instruction: u16, source: MemoryError },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CpuError {
    /// The step touched an address outside a memory component.
    pub fn is_bad_address(&self) -> bool {
        matches!(
            self,
            CpuError::Fetch { source: MemoryError::BadAddress(_), .. }
                | CpuError::Memory { source: MemoryError::BadAddress(_), .. }
        )
    }

    /// The step hit an undefined `comp` pattern.
    pub fn is_bad_instruction(&self) -> bool {
        matches!(self, CpuError::Decode(DecodeError::BadInstruction(_)))
    }

    /// The raw instruction word being executed, if one was fetched.
    pub fn instruction(&self) -> Option<u16> {
        match self {
            CpuError::Fetch { .. } => None,
            CpuError::Memory { instruction, .. } => Some(*instruction),
            CpuError::Decode(DecodeError::BadInstruction(word)) => Some(*word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::alu::AluOp;
    use crate::cpu::decode::{encode, Dest, Jump};
    use crate::cpu::memory::{index, Address, Rom, WriteMemory};
    use proptest::prelude::*;

    /// Flat 0x6001-word data memory for engine tests.
    struct FlatRam(Vec<Word>);

    impl ReadMemory for FlatRam {
        fn read(&self, address: Address) -> Result<Word, MemoryError> {
            Ok(self.0[index(address, self.0.len())?])
        }
    }

    impl WriteMemory for FlatRam {
        fn write(&mut self, address: Address, word: Word) -> Result<(), MemoryError> {
            let i = index(address, self.0.len())?;
            self.0[i] = word;
            Ok(())
        }
    }

    fn make_program(instructions: &[Instruction]) -> Vec<Word> {
        instructions.iter().map(|i| encode(i) as Word).collect()
    }

    fn cpu_with(instructions: &[Instruction]) -> Cpu<Rom, FlatRam> {
        let rom = Rom::with_program(&make_program(instructions)).unwrap();
        Cpu::new(FlatRam(vec![0; 0x6001]), rom)
    }

    fn c(source: Source, op: AluOp, dest: Dest, jump: Jump) -> Instruction {
        Instruction::compute(source, op, dest, jump)
    }

    const D: Dest = Dest { a: false, d: true, m: false };
    const M: Dest = Dest { a: false, d: false, m: true };
    const AMD: Dest = Dest { a: true, d: true, m: true };

    #[test]
    fn test_address_instruction() {
        let mut cpu = cpu_with(&[Instruction::at(1234)]);
        cpu.regs.d = 77;

        let executed = cpu.step().unwrap();

        assert_eq!(executed, Instruction::Address(1234));
        assert_eq!(cpu.a(), 1234);
        assert_eq!(cpu.d(), 77);
        assert_eq!(cpu.pc(), 1);
        assert_eq!(cpu.cycles, 1);
    }

    #[test]
    fn test_d_plus_m_to_memory() {
        let mut cpu = cpu_with(&[
            Instruction::at(10),
            c(Source::M, AluOp::DPlusX, M, Jump::Never),
        ]);
        cpu.regs.d = 3;
        cpu.ram_mut().write(10, 4).unwrap();

        cpu.run_limited(2).unwrap();

        assert_eq!(cpu.ram().read(10), Ok(7));
        assert_eq!(cpu.pc(), 2);
    }

    #[test]
    fn test_m_write_uses_old_a() {
        // AMD=A+1 with A=20: M[20], A and D all become 21.
        let mut cpu = cpu_with(&[
            Instruction::at(20),
            c(Source::A, AluOp::XPlusOne, AMD, Jump::Never),
        ]);

        cpu.run_limited(2).unwrap();

        assert_eq!(cpu.ram().read(20), Ok(21));
        assert_eq!(cpu.ram().read(21), Ok(0));
        assert_eq!(cpu.a(), 21);
        assert_eq!(cpu.d(), 21);
    }

    #[test]
    fn test_jump_uses_new_a() {
        // A=D;JMP jumps to the value just written into A.
        let dest = Dest { a: true, d: false, m: false };
        let mut cpu = cpu_with(&[
            Instruction::at(100),
            c(Source::A, AluOp::D, dest, Jump::Always),
        ]);
        cpu.regs.d = 5;

        cpu.run_limited(2).unwrap();

        assert_eq!(cpu.pc(), 5);
    }

    #[test]
    fn test_jump_conditions() {
        let cases = [
            (Jump::Never, [false, false, false]),
            (Jump::Gt, [false, false, true]),
            (Jump::Eq, [false, true, false]),
            (Jump::Ge, [false, true, true]),
            (Jump::Lt, [true, false, false]),
            (Jump::Ne, [true, false, true]),
            (Jump::Le, [true, true, false]),
            (Jump::Always, [true, true, true]),
        ];

        for (jump, taken) in cases {
            for (d, expect_jump) in [-3, 0, 3].into_iter().zip(taken) {
                let mut cpu = cpu_with(&[
                    Instruction::at(500),
                    c(Source::A, AluOp::D, Dest::NONE, jump),
                ]);
                cpu.regs.d = d;

                cpu.run_limited(2).unwrap();

                let expected_pc = if expect_jump { 500 } else { 2 };
                assert_eq!(cpu.pc(), expected_pc, "{:?} with D={}", jump, d);
            }
        }
    }

    #[test]
    fn test_alu_overflow_wraps() {
        let mut cpu = cpu_with(&[c(Source::A, AluOp::DPlusOne, D, Jump::Lt)]);
        cpu.regs.d = i16::MAX;
        cpu.regs.a = 9;

        cpu.step().unwrap();

        assert_eq!(cpu.d(), i16::MIN);
        assert_eq!(cpu.pc(), 9);
    }

    #[test]
    fn test_neg_a_ignores_m_bit() {
        // With the `a` bit set, -A must not touch memory: A=0x7000 is
        // outside the address space but the step still succeeds.
        let mut cpu = cpu_with(&[
            Instruction::at(0x7000),
            c(Source::M, AluOp::NegA, D, Jump::Never),
        ]);

        cpu.run_limited(2).unwrap();

        assert_eq!(cpu.d(), -0x7000);
    }

    #[test]
    fn test_bad_instruction_leaves_pc() {
        let mut cpu = cpu_with(&[]);
        let bad = 0b1110_0000_0101_0000u16;
        cpu.rom_mut().load(&[bad as Word]).unwrap();

        let err = cpu.step().unwrap_err();

        assert!(err.is_bad_instruction());
        assert_eq!(err.instruction(), Some(bad));
        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.cycles, 0);
    }

    #[test]
    fn test_bad_address_on_m_read() {
        let mut cpu = cpu_with(&[
            Instruction::at(0x6001),
            c(Source::M, AluOp::X, D, Jump::Never),
        ]);
        cpu.regs.d = 8;

        cpu.step().unwrap();
        let err = cpu.step().unwrap_err();

        assert!(err.is_bad_address());
        assert_eq!(
            err,
            CpuError::Memory {
                instruction: 0b1111_1100_0001_0000,
                source: MemoryError::BadAddress(0x6001),
            }
        );
        assert_eq!(cpu.d(), 8);
        assert_eq!(cpu.pc(), 1);
    }

    #[test]
    fn test_bad_address_on_m_write_keeps_registers() {
        let mut cpu = cpu_with(&[
            Instruction::at(0x7000),
            c(Source::A, AluOp::One, AMD, Jump::Never),
        ]);

        cpu.step().unwrap();
        let err = cpu.step().unwrap_err();

        assert!(err.is_bad_address());
        assert_eq!(cpu.a(), 0x7000);
        assert_eq!(cpu.d(), 0);
    }

    #[test]
    fn test_fetch_past_rom() {
        let mut cpu = cpu_with(&[]);
        cpu.regs.pc = 0x8000;

        let err = cpu.step().unwrap_err();

        assert_eq!(
            err,
            CpuError::Fetch { pc: 0x8000, source: MemoryError::BadAddress(0x8000) }
        );
        assert_eq!(err.instruction(), None);
    }

    #[test]
    fn test_reset_only_clears_pc() {
        let mut cpu = cpu_with(&[Instruction::at(5), c(Source::A, AluOp::X, D, Jump::Never)]);
        cpu.run_limited(2).unwrap();

        cpu.reset();

        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.a(), 5);
        assert_eq!(cpu.d(), 5);
    }

    #[test]
    fn test_load_restarts() {
        let mut cpu = cpu_with(&[Instruction::at(5)]);
        cpu.step().unwrap();

        cpu.load(Rom::with_program(&make_program(&[Instruction::at(9)])).unwrap());
        cpu.step().unwrap();

        assert_eq!(cpu.a(), 9);
        assert_eq!(cpu.pc(), 1);
    }

    #[test]
    fn test_run_limited_accepts_any_batch_size() {
        // @0, D=M+1, then an undefined comp at address 2 ends the batch.
        let mut program = make_program(&[
            Instruction::at(0),
            c(Source::M, AluOp::XPlusOne, D, Jump::Never),
        ]);
        program.push(0xE040u16 as Word);
        let rom = Rom::with_program(&program).unwrap();
        let mut cpu = Cpu::new(FlatRam(vec![0; 16]), rom);
        cpu.step().unwrap();

        let err = cpu.run_limited(u64::MAX).unwrap_err();

        assert!(err.is_bad_instruction());
        assert_eq!(cpu.cycles, 2);
        assert_eq!(cpu.pc(), 2);
        assert_eq!(cpu.d(), 1);
    }

    #[test]
    fn test_run_limited_zero() {
        let mut cpu = cpu_with(&[Instruction::at(3)]);
        cpu.step().unwrap();

        assert_eq!(cpu.run_limited(0), Ok(0));
        assert_eq!(cpu.cycles, 1);
    }

    proptest! {
        #[test]
        fn address_instruction_sets_a(word in 0u16..0x8000, d: i16, pc in 0u16..0x7FFF) {
            let mut program = vec![0 as Word; pc as usize + 1];
            program[pc as usize] = word as Word;
            let rom = Rom::with_program(&program).unwrap();
            let mut cpu = Cpu::new(FlatRam(vec![0; 16]), rom);
            cpu.regs.d = d;
            cpu.regs.pc = pc;

            cpu.step().unwrap();

            prop_assert_eq!(cpu.a(), (word & 0x7FFF) as Word);
            prop_assert_eq!(cpu.d(), d);
            prop_assert_eq!(cpu.pc(), pc + 1);
        }
    }
}
