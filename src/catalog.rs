//! Fixed library of Z80 test programs.
//!
//! Each case is a pure function returning the bytes to place at address 0.
//! Expected CPU state after `HALT` is noted next to the instructions.

use crate::program::{ProgramBuilder, ProgramError};

pub mod opcode;

use opcode::{CALL_NN, CALL_NZ_NN, CALL_Z_NN, DJNZ, HALT, JP_NN, LD_A_N, LD_SP_NN, RET};

pub type BuildFn = fn() -> Result<Vec<u8>, ProgramError>;

pub const ROM_EXTENSION: &str = "rom";

#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    pub name: &'static str,
    pub summary: &'static str,
    pub build: BuildFn,
}

impl TestCase {
    /// File name for the case at 1-based `ordinal`, e.g. `07_djnz_loop.rom`.
    #[must_use]
    pub fn file_name(&self, ordinal: usize) -> String {
        format!("{ordinal:02}_{}.{ROM_EXTENSION}", self.name)
    }

    /// # Errors
    /// Propagates definition errors from the case body.
    pub fn program(&self) -> Result<Vec<u8>, ProgramError> {
        (self.build)()
    }
}

/// Cases in file-number order; ordinal is index + 1.
pub const CATALOG: &[TestCase] = &[
    TestCase { name: "nop_halt", summary: "NOP and HALT", build: nop_halt },
    TestCase { name: "load_immediate", summary: "LD r,n", build: load_immediate },
    TestCase { name: "increment", summary: "INC r with wrap to zero", build: increment },
    TestCase { name: "decrement", summary: "DEC r down to zero", build: decrement },
    TestCase { name: "16bit_ops", summary: "LD rr,nn / INC rr / DEC rr", build: sixteen_bit_ops },
    TestCase { name: "jump", summary: "JP nn", build: jump },
    TestCase { name: "djnz_loop", summary: "DJNZ loop", build: djnz_loop },
    TestCase { name: "ld_r_r", summary: "LD r,r' register copies", build: ld_r_r },
    TestCase { name: "ld_memory", summary: "LD (HL),A / LD A,(HL)", build: ld_memory },
    TestCase { name: "add", summary: "ADD A,r", build: add },
    TestCase { name: "sub", summary: "SUB r", build: sub },
    TestCase { name: "adc", summary: "ADC A,r", build: adc },
    TestCase { name: "sbc", summary: "SBC A,r", build: sbc },
    TestCase { name: "and", summary: "AND r", build: and },
    TestCase { name: "or", summary: "OR r", build: or },
    TestCase { name: "xor", summary: "XOR r", build: xor },
    TestCase { name: "cp", summary: "CP r", build: cp },
    TestCase { name: "logical_memory", summary: "AND/OR/XOR/CP (HL)", build: logical_memory },
    TestCase { name: "ld_bc_de_indirect", summary: "LD (BC),A / LD (DE),A and back", build: ld_bc_de_indirect },
    TestCase { name: "ld_nn_direct", summary: "LD (nn),A / LD A,(nn)", build: ld_nn_direct },
    TestCase { name: "ld_hl_memory", summary: "LD (nn),HL / LD HL,(nn)", build: ld_hl_memory },
    TestCase { name: "di_ei", summary: "DI / EI", build: di_ei },
    TestCase { name: "push_pop", summary: "PUSH rr / POP rr", build: push_pop },
    TestCase { name: "call_ret", summary: "CALL nn / RET", build: call_ret },
    TestCase { name: "conditional_call", summary: "CALL cc,nn", build: conditional_call },
];

/// Looks a case up by name, returning its 1-based ordinal with it.
#[must_use]
pub fn find(name: &str) -> Option<(usize, &'static TestCase)> {
    CATALOG
        .iter()
        .enumerate()
        .find(|(_, case)| case.name == name)
        .map(|(idx, case)| (idx + 1, case))
}

/// Stack top used by the stack and subroutine cases (top of 1 KiB RAM at 0x4000).
const STACK_TOP: u16 = 0x43ff;

fn nop_halt() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x00, // NOP
        0x00, // NOP
        0x00, // NOP
        0x76, // HALT
    ])
}

fn load_immediate() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x42, // LD A, 0x42
        0x06, 0x12, // LD B, 0x12
        0x0e, 0x34, // LD C, 0x34
        0x16, 0x56, // LD D, 0x56
        0x1e, 0x78, // LD E, 0x78
        0x26, 0x9a, // LD H, 0x9A
        0x2e, 0xbc, // LD L, 0xBC
        0x76, // HALT
    ])
}

fn increment() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x00, // LD A, 0x00
        0x3c, // INC A        ; A = 0x01
        0x3c, // INC A        ; A = 0x02
        0x3c, // INC A        ; A = 0x03
        0x06, 0xfe, // LD B, 0xFE
        0x04, // INC B        ; B = 0xFF
        0x04, // INC B        ; B = 0x00, Z set
        0x76, // HALT
    ])
}

fn decrement() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x05, // LD A, 0x05
        0x3d, // DEC A        ; A = 0x04
        0x3d, // DEC A        ; A = 0x03
        0x3d, // DEC A        ; A = 0x02
        0x3d, // DEC A        ; A = 0x01
        0x3d, // DEC A        ; A = 0x00, Z set
        0x76, // HALT
    ])
}

fn sixteen_bit_ops() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x01, 0x00, 0x10, // LD BC, 0x1000
        0x03, // INC BC       ; BC = 0x1001
        0x03, // INC BC       ; BC = 0x1002
        0x0b, // DEC BC       ; BC = 0x1001
        0x11, 0xff, 0xff, // LD DE, 0xFFFF
        0x13, // INC DE       ; DE = 0x0000 (wraps)
        0x76, // HALT
    ])
}

fn jump() -> Result<Vec<u8>, ProgramError> {
    const TARGET: u16 = 0x0007;
    let mut p = ProgramBuilder::new();
    p.emit(&[LD_A_N, 0x01]); // 0x0000
    p.emit(&[JP_NN]).word(TARGET); // 0x0002
    p.emit(&[LD_A_N, 0xff]); // 0x0005, skipped
    p.pad_to(usize::from(TARGET))?;
    p.emit(&[LD_A_N, 0x42]); // A = 0x42
    p.emit(&[HALT]);
    Ok(p.finish())
}

fn djnz_loop() -> Result<Vec<u8>, ProgramError> {
    let mut p = ProgramBuilder::new();
    p.emit(&[0x06, 0x05]); // LD B, 5
    p.emit(&[LD_A_N, 0x00]); // LD A, 0
    let top = p.position();
    p.emit(&[0x3c]); // INC A
    p.relative(DJNZ, top)?;
    // A = 5, B = 0
    p.emit(&[HALT]);
    Ok(p.finish())
}

fn ld_r_r() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x42, // LD A, 0x42
        0x47, // LD B, A      ; B = 0x42
        0x48, // LD C, B      ; C = 0x42
        0x51, // LD D, C      ; D = 0x42
        0x5a, // LD E, D      ; E = 0x42
        0x63, // LD H, E      ; H = 0x42
        0x6c, // LD L, H      ; L = 0x42
        0x7d, // LD A, L      ; A = 0x42
        0x76, // HALT
    ])
}

fn ld_memory() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x21, 0x00, 0x40, // LD HL, 0x4000
        0x3e, 0x99, // LD A, 0x99
        0x77, // LD (HL), A   ; RAM[0x4000] = 0x99
        0x3e, 0x00, // LD A, 0x00
        0x7e, // LD A, (HL)
        0x76, // HALT         ; A = 0x99
    ])
}

fn add() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x10, // LD A, 0x10
        0x06, 0x05, // LD B, 0x05
        0x80, // ADD A, B     ; A = 0x15
        0x3e, 0xff, // LD A, 0xFF
        0x0e, 0x02, // LD C, 0x02
        0x81, // ADD A, C     ; A = 0x01, C set
        0x3e, 0x00, // LD A, 0x00
        0x16, 0x00, // LD D, 0x00
        0x82, // ADD A, D     ; A = 0x00, Z set
        0x3e, 0x7f, // LD A, 0x7F
        0x1e, 0x01, // LD E, 0x01
        0x83, // ADD A, E     ; A = 0x80, P/V set
        0x76, // HALT
    ])
}

fn sub() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x10, // LD A, 0x10
        0x06, 0x05, // LD B, 0x05
        0x90, // SUB B        ; A = 0x0B
        0x3e, 0x05, // LD A, 0x05
        0x0e, 0x10, // LD C, 0x10
        0x91, // SUB C        ; A = 0xF5, C set
        0x3e, 0x42, // LD A, 0x42
        0x16, 0x42, // LD D, 0x42
        0x92, // SUB D        ; A = 0x00, Z set
        0x3e, 0x80, // LD A, 0x80
        0x1e, 0x01, // LD E, 0x01
        0x93, // SUB E        ; A = 0x7F, P/V set
        0x76, // HALT
    ])
}

fn adc() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x10, // LD A, 0x10
        0x06, 0x05, // LD B, 0x05
        0x37, // SCF
        0x3f, // CCF          ; carry clear
        0x88, // ADC A, B     ; A = 0x15
        0x3e, 0x10, // LD A, 0x10
        0x0e, 0x05, // LD C, 0x05
        0x37, // SCF
        0x89, // ADC A, C     ; A = 0x16
        0x3e, 0xff, // LD A, 0xFF
        0x16, 0x01, // LD D, 0x01
        0x37, // SCF
        0x8a, // ADC A, D     ; A = 0x01, C set
        0x3e, 0x00, // LD A, 0x00
        0x1e, 0xff, // LD E, 0xFF
        0x83, // ADD A, E     ; A = 0xFF, C clear
        0x3e, 0x00, // LD A, 0x00
        0x26, 0x01, // LD H, 0x01
        0x84, // ADD A, H     ; A = 0x01, C clear
        0x76, // HALT
    ])
}

fn sbc() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x10, // LD A, 0x10
        0x06, 0x05, // LD B, 0x05
        0x37, // SCF
        0x3f, // CCF          ; carry clear
        0x98, // SBC A, B     ; A = 0x0B
        0x3e, 0x10, // LD A, 0x10
        0x0e, 0x05, // LD C, 0x05
        0x37, // SCF
        0x99, // SBC A, C     ; A = 0x0A
        0x3e, 0x00, // LD A, 0x00
        0x16, 0x01, // LD D, 0x01
        0x37, // SCF
        0x9a, // SBC A, D     ; A = 0xFE, C set
        0x3e, 0x06, // LD A, 0x06
        0x1e, 0x05, // LD E, 0x05
        0x37, // SCF
        0x9b, // SBC A, E     ; A = 0x00, Z set
        0x76, // HALT
    ])
}

fn and() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0xff, // LD A, 0xFF
        0x06, 0x0f, // LD B, 0x0F
        0xa0, // AND B        ; A = 0x0F
        0x3e, 0xf0, // LD A, 0xF0
        0x0e, 0x0f, // LD C, 0x0F
        0xa1, // AND C        ; A = 0x00, Z set
        0x3e, 0xff, // LD A, 0xFF
        0x16, 0xff, // LD D, 0xFF
        0xa2, // AND D        ; A = 0xFF, S set
        0x3e, 0xff, // LD A, 0xFF
        0x1e, 0x80, // LD E, 0x80
        0xa3, // AND E        ; A = 0x80, S set
        0x3e, 0x42, // LD A, 0x42
        0xa7, // AND A        ; A = 0x42
        0x76, // HALT
    ])
}

fn or() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0xf0, // LD A, 0xF0
        0x06, 0x0f, // LD B, 0x0F
        0xb0, // OR B         ; A = 0xFF
        0x3e, 0x00, // LD A, 0x00
        0x0e, 0x00, // LD C, 0x00
        0xb1, // OR C         ; A = 0x00, Z set
        0x3e, 0x80, // LD A, 0x80
        0xb7, // OR A         ; A = 0x80, S set
        0x3e, 0x00, // LD A, 0x00
        0x16, 0x01, // LD D, 0x01
        0xb2, // OR D         ; A = 0x01
        0x3e, 0x55, // LD A, 0x55
        0x1e, 0xaa, // LD E, 0xAA
        0xb3, // OR E         ; A = 0xFF
        0x76, // HALT
    ])
}

fn xor() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0xff, // LD A, 0xFF
        0x06, 0x0f, // LD B, 0x0F
        0xa8, // XOR B        ; A = 0xF0
        0x3e, 0x42, // LD A, 0x42
        0xaf, // XOR A        ; A = 0x00, Z set
        0x3e, 0x7f, // LD A, 0x7F
        0x0e, 0xff, // LD C, 0xFF
        0xa9, // XOR C        ; A = 0x80, S set
        0x3e, 0x55, // LD A, 0x55
        0x16, 0xaa, // LD D, 0xAA
        0xaa, // XOR D        ; A = 0xFF
        0x3e, 0x42, // LD A, 0x42
        0x1e, 0x99, // LD E, 0x99
        0xab, // XOR E        ; A = 0xDB
        0xab, // XOR E        ; A = 0x42
        0x76, // HALT
    ])
}

fn cp() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x42, // LD A, 0x42
        0x06, 0x42, // LD B, 0x42
        0xb8, // CP B         ; Z set
        0x3e, 0x10, // LD A, 0x10
        0x0e, 0x05, // LD C, 0x05
        0xb9, // CP C         ; no Z, no C
        0x3e, 0x05, // LD A, 0x05
        0x16, 0x10, // LD D, 0x10
        0xba, // CP D         ; C set
        0x3e, 0x00, // LD A, 0x00
        0x1e, 0x00, // LD E, 0x00
        0xbb, // CP E         ; Z set
        0x3e, 0x00, // LD A, 0x00
        0x26, 0x01, // LD H, 0x01
        0xbc, // CP H         ; S set
        0x3e, 0x99, // LD A, 0x99
        0xbf, // CP A         ; Z set, A = 0x99
        0x76, // HALT
    ])
}

fn logical_memory() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x21, 0x00, 0x40, // LD HL, 0x4000
        0x3e, 0x0f, // LD A, 0x0F
        0x77, // LD (HL), A   ; RAM[0x4000] = 0x0F
        0x3e, 0xff, // LD A, 0xFF
        0xa6, // AND (HL)     ; A = 0x0F
        0x3e, 0xf0, // LD A, 0xF0
        0xb6, // OR (HL)      ; A = 0xFF
        0x3e, 0xff, // LD A, 0xFF
        0xae, // XOR (HL)     ; A = 0xF0
        0x3e, 0x0f, // LD A, 0x0F
        0xbe, // CP (HL)      ; Z set
        0x76, // HALT
    ])
}

fn ld_bc_de_indirect() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x01, 0x00, 0x40, // LD BC, 0x4000
        0x11, 0x10, 0x40, // LD DE, 0x4010
        0x3e, 0x42, // LD A, 0x42
        0x02, // LD (BC), A   ; RAM[0x4000] = 0x42
        0x3e, 0x99, // LD A, 0x99
        0x12, // LD (DE), A   ; RAM[0x4010] = 0x99
        0x3e, 0x00, // LD A, 0x00
        0x0a, // LD A, (BC)   ; A = 0x42
        0x3e, 0x00, // LD A, 0x00
        0x1a, // LD A, (DE)   ; A = 0x99
        0x76, // HALT
    ])
}

fn ld_nn_direct() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x3e, 0x55, // LD A, 0x55
        0x32, 0x00, 0x40, // LD (0x4000), A
        0x3e, 0xaa, // LD A, 0xAA
        0x32, 0x20, 0x40, // LD (0x4020), A
        0x3e, 0x00, // LD A, 0x00
        0x3a, 0x00, 0x40, // LD A, (0x4000)  ; A = 0x55
        0x3e, 0x00, // LD A, 0x00
        0x3a, 0x20, 0x40, // LD A, (0x4020)  ; A = 0xAA
        0x76, // HALT
    ])
}

fn ld_hl_memory() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x21, 0x34, 0x12, // LD HL, 0x1234
        0x22, 0x00, 0x40, // LD (0x4000), HL  ; RAM[0x4000..2] = 34 12
        0x21, 0x00, 0x00, // LD HL, 0x0000
        0x2a, 0x00, 0x40, // LD HL, (0x4000)  ; HL = 0x1234
        0x21, 0xcd, 0xab, // LD HL, 0xABCD
        0x22, 0x10, 0x40, // LD (0x4010), HL
        0x21, 0x00, 0x00, // LD HL, 0x0000
        0x2a, 0x10, 0x40, // LD HL, (0x4010)  ; HL = 0xABCD
        0x76, // HALT
    ])
}

fn di_ei() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0xfb, // EI           ; IFF1 = IFF2 = 1
        0x3e, 0x42, // LD A, 0x42
        0x04, // INC B
        0xf3, // DI           ; IFF1 = IFF2 = 0
        0x3e, 0x99, // LD A, 0x99
        0x05, // DEC B
        0xfb, // EI
        0x76, // HALT
    ])
}

fn push_pop() -> Result<Vec<u8>, ProgramError> {
    Ok(vec![
        0x31, 0xff, 0x43, // LD SP, 0x43FF
        0x01, 0x34, 0x12, // LD BC, 0x1234
        0x11, 0x78, 0x56, // LD DE, 0x5678
        0x21, 0xbc, 0x9a, // LD HL, 0x9ABC
        0x3e, 0x42, // LD A, 0x42
        0x06, 0x55, // LD B, 0x55
        0xc5, // PUSH BC
        0xd5, // PUSH DE
        0xe5, // PUSH HL
        0x01, 0x00, 0x00, // LD BC, 0x0000
        0x11, 0x00, 0x00, // LD DE, 0x0000
        0x21, 0x00, 0x00, // LD HL, 0x0000
        0xe1, // POP HL       ; HL = 0x9ABC
        0xd1, // POP DE       ; DE = 0x5678
        0xc1, // POP BC       ; BC = 0x5534
        0x76, // HALT
    ])
}

fn call_ret() -> Result<Vec<u8>, ProgramError> {
    const SUBROUTINE: u16 = 0x000c;
    let mut p = ProgramBuilder::new();
    p.emit(&[LD_SP_NN]).word(STACK_TOP);
    p.emit(&[LD_A_N, 0x01]);
    p.emit(&[CALL_NN]).word(SUBROUTINE);
    p.emit(&[LD_A_N, 0x03]); // after return, A = 0x03
    p.emit(&[HALT]);
    p.pad_to(usize::from(SUBROUTINE))?;
    p.emit(&[LD_A_N, 0x02]);
    p.emit(&[RET]);
    Ok(p.finish())
}

fn conditional_call() -> Result<Vec<u8>, ProgramError> {
    const INC_B: u16 = 0x0020;
    const INC_C: u16 = 0x0025;
    let mut p = ProgramBuilder::new();
    p.emit(&[LD_SP_NN]).word(STACK_TOP);
    p.emit(&[LD_A_N, 0x01]);
    p.emit(&[CALL_Z_NN]).word(INC_B); // not taken
    p.emit(&[CALL_NZ_NN]).word(INC_B); // taken, B = 1
    p.emit(&[LD_A_N, 0x00]);
    p.emit(&[0xb7]); // OR A, Z set
    p.emit(&[CALL_Z_NN]).word(INC_C); // taken, C = 1
    p.emit(&[HALT]);
    p.pad_to(usize::from(INC_B))?;
    p.emit(&[0x04, RET]); // INC B; RET
    p.pad_to(usize::from(INC_C))?;
    p.emit(&[0x0c, RET]); // INC C; RET
    Ok(p.finish())
}
