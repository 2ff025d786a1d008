use thiserror::Error;

/// Fill used for gaps inside a program, where the gap bytes execute as NOP.
pub const PROGRAM_FILL: u8 = 0x00;

/// Length in bytes of a Z80 short relative branch (`DJNZ e`, `JR e`, `JR cc,e`).
const RELATIVE_BRANCH_LEN: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("cannot pad to offset {target:#06x}: program already extends to {position:#06x}")]
    PadBehindCursor { target: usize, position: usize },
    #[error("relative branch at {branch:#06x} cannot reach {target:#06x} (distance {distance})")]
    DisplacementOutOfRange {
        branch: usize,
        target: usize,
        distance: i64,
    },
}

/// Extends `current` with `fill` bytes so that the next byte lands at `target_offset`.
///
/// # Errors
/// Returns `ProgramError::PadBehindCursor` when `current` already reaches past
/// `target_offset`.
pub fn pad_to(mut current: Vec<u8>, target_offset: usize, fill: u8) -> Result<Vec<u8>, ProgramError> {
    let Some(gap) = target_offset.checked_sub(current.len()) else {
        return Err(ProgramError::PadBehindCursor {
            target: target_offset,
            position: current.len(),
        });
    };
    current.resize(current.len() + gap, fill);
    Ok(current)
}

/// Computes the displacement operand of a two-byte relative branch whose
/// opcode sits at `branch` and which should land on `target`.
///
/// # Errors
/// Returns `ProgramError::DisplacementOutOfRange` when the target is not
/// reachable with a signed 8-bit displacement.
pub fn relative_displacement(branch: usize, target: usize) -> Result<u8, ProgramError> {
    let next = branch as i64 + RELATIVE_BRANCH_LEN as i64;
    let distance = target as i64 - next;
    let disp = i8::try_from(distance).map_err(|_| ProgramError::DisplacementOutOfRange {
        branch,
        target,
        distance,
    })?;
    Ok(disp as u8)
}

/// Appends bytes in fetch order starting at address 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramBuilder {
    bytes: Vec<u8>,
}

impl ProgramBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next emitted byte will occupy.
    #[must_use]
    pub fn position(&self) -> usize {
        self.bytes.len()
    }

    pub fn emit(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Emits a 16-bit operand, low byte first.
    pub fn word(&mut self, value: u16) -> &mut Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Fills with `PROGRAM_FILL` up to `target_offset`.
    ///
    /// # Errors
    /// Fails when the program has already passed `target_offset`.
    pub fn pad_to(&mut self, target_offset: usize) -> Result<&mut Self, ProgramError> {
        if target_offset < self.bytes.len() {
            return Err(ProgramError::PadBehindCursor {
                target: target_offset,
                position: self.bytes.len(),
            });
        }
        self.bytes.resize(target_offset, PROGRAM_FILL);
        Ok(self)
    }

    /// Emits `opcode` followed by the displacement that branches to `target`.
    ///
    /// # Errors
    /// Fails when `target` is out of reach of an 8-bit displacement.
    pub fn relative(&mut self, opcode: u8, target: usize) -> Result<&mut Self, ProgramError> {
        let disp = relative_displacement(self.position(), target)?;
        self.bytes.extend_from_slice(&[opcode, disp]);
        Ok(self)
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
