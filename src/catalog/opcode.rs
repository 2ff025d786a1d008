pub const DJNZ: u8 = 0x10;
pub const HALT: u8 = 0x76;
pub const LD_A_N: u8 = 0x3e;
pub const LD_SP_NN: u8 = 0x31;

pub const JP_NN: u8 = 0xc3;
pub const CALL_NN: u8 = 0xcd;
pub const CALL_NZ_NN: u8 = 0xc4;
pub const CALL_Z_NN: u8 = 0xcc;
pub const RET: u8 = 0xc9;
