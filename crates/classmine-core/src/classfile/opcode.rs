//! Opcode classification and `Code` attribute decoding.

use tracing::debug;

use super::constant_pool::ConstantPool;
use super::error::ClassFileError;
use super::MemberRef;
use crate::ontology::RelationKind;

pub const GETSTATIC: u8 = 0xb2;
pub const PUTSTATIC: u8 = 0xb3;
pub const GETFIELD: u8 = 0xb4;
pub const PUTFIELD: u8 = 0xb5;
pub const INVOKEVIRTUAL: u8 = 0xb6;
pub const INVOKESPECIAL: u8 = 0xb7;
pub const INVOKESTATIC: u8 = 0xb8;
pub const INVOKEINTERFACE: u8 = 0xb9;
pub const INVOKEDYNAMIC: u8 = 0xba;
pub const NEW: u8 = 0xbb;
pub const CHECKCAST: u8 = 0xc0;
pub const INSTANCEOF: u8 = 0xc1;

const IINC: u8 = 0x84;
const TABLESWITCH: u8 = 0xaa;
const LOOKUPSWITCH: u8 = 0xab;
const WIDE: u8 = 0xc4;

/// Relation-relevant classification of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeClass {
    FieldRead,
    FieldWrite,
    Invoke,
    CheckCast,
    InstanceOf,
    New,
    Other,
}

impl OpcodeClass {
    /// The relation an instruction of this class produces, if any.
    pub fn relation(&self) -> Option<RelationKind> {
        match self {
            OpcodeClass::FieldRead => Some(RelationKind::Reads),
            OpcodeClass::FieldWrite => Some(RelationKind::Writes),
            OpcodeClass::Invoke => Some(RelationKind::Calls),
            OpcodeClass::CheckCast => Some(RelationKind::Casts),
            OpcodeClass::InstanceOf => Some(RelationKind::Checks),
            OpcodeClass::New => Some(RelationKind::Instantiates),
            OpcodeClass::Other => None,
        }
    }
}

pub fn classify(opcode: u8) -> OpcodeClass {
    match opcode {
        GETFIELD | GETSTATIC => OpcodeClass::FieldRead,
        PUTFIELD | PUTSTATIC => OpcodeClass::FieldWrite,
        INVOKEVIRTUAL | INVOKESPECIAL | INVOKESTATIC | INVOKEINTERFACE => OpcodeClass::Invoke,
        CHECKCAST => OpcodeClass::CheckCast,
        INSTANCEOF => OpcodeClass::InstanceOf,
        NEW => OpcodeClass::New,
        _ => OpcodeClass::Other,
    }
}

/// Symbolic operand of a relation-bearing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Field or method reference.
    Member(MemberRef),
    /// Internal class name, or an array descriptor starting with `[`.
    Type(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub offset: usize,
    pub opcode: u8,
    pub class: OpcodeClass,
    pub operand: Operand,
}

/// Fixed length of an instruction including the opcode byte.
///
/// Returns `None` for variable-length and invalid opcodes.
fn fixed_length(opcode: u8) -> Option<usize> {
    let len = match opcode {
        0x00..=0x0f => 1,
        0x10 => 2,        // bipush
        0x11 => 3,        // sipush
        0x12 => 2,        // ldc
        0x13 | 0x14 => 3, // ldc_w, ldc2_w
        0x15..=0x19 => 2, // xload
        0x1a..=0x35 => 1,
        0x36..=0x3a => 2, // xstore
        0x3b..=0x83 => 1,
        IINC => 3,
        0x85..=0x98 => 1,
        0x99..=0xa8 => 3, // branches, goto, jsr
        0xa9 => 2,        // ret
        0xac..=0xb1 => 1, // returns
        0xb2..=0xb8 => 3,
        INVOKEINTERFACE | INVOKEDYNAMIC => 5,
        NEW => 3,
        0xbc => 2, // newarray
        0xbd => 3, // anewarray
        0xbe | 0xbf => 1,
        CHECKCAST | INSTANCEOF => 3,
        0xc2 | 0xc3 => 1,
        0xc5 => 4,        // multianewarray
        0xc6 | 0xc7 => 3, // ifnull, ifnonnull
        0xc8 | 0xc9 => 5, // goto_w, jsr_w
        0xca => 1,        // breakpoint
        _ => return None,
    };
    Some(len)
}

fn read_u2(code: &[u8], at: usize) -> Result<u16, ClassFileError> {
    match code.get(at..at + 2) {
        Some(b) => Ok(u16::from_be_bytes([b[0], b[1]])),
        None => Err(ClassFileError::UnexpectedEof),
    }
}

fn read_i4(code: &[u8], at: usize) -> Result<i32, ClassFileError> {
    match code.get(at..at + 4) {
        Some(b) => Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(ClassFileError::UnexpectedEof),
    }
}

fn instruction_length(code: &[u8], pc: usize) -> Result<usize, ClassFileError> {
    let opcode = code[pc];
    if let Some(len) = fixed_length(opcode) {
        return Ok(len);
    }

    match opcode {
        TABLESWITCH => {
            let base = pc + 1 + (4 - (pc + 1) % 4) % 4;
            let low = read_i4(code, base + 4)? as i64;
            let high = read_i4(code, base + 8)? as i64;
            let count = high - low + 1;
            if count < 0 {
                return Err(ClassFileError::InvalidOpcode { opcode, offset: pc });
            }
            Ok(base - pc + 12 + count as usize * 4)
        }
        LOOKUPSWITCH => {
            let base = pc + 1 + (4 - (pc + 1) % 4) % 4;
            let pairs = read_i4(code, base + 4)?;
            if pairs < 0 {
                return Err(ClassFileError::InvalidOpcode { opcode, offset: pc });
            }
            Ok(base - pc + 8 + pairs as usize * 8)
        }
        WIDE => match code.get(pc + 1) {
            Some(&IINC) => Ok(6),
            Some(_) => Ok(4),
            None => Err(ClassFileError::UnexpectedEof),
        },
        _ => Err(ClassFileError::InvalidOpcode { opcode, offset: pc }),
    }
}

/// Decode a method body, keeping only relation-bearing instructions.
pub(crate) fn decode_code(
    code: &[u8],
    pool: &ConstantPool,
) -> Result<Vec<Instruction>, ClassFileError> {
    let mut instructions = Vec::new();
    let mut pc = 0;

    while pc < code.len() {
        let opcode = code[pc];
        let length = instruction_length(code, pc)?;
        if pc + length > code.len() {
            return Err(ClassFileError::UnexpectedEof);
        }

        let class = classify(opcode);
        match class {
            OpcodeClass::Other => {
                if opcode == INVOKEDYNAMIC {
                    debug!(offset = pc, "Skipping invokedynamic call site");
                }
            }
            OpcodeClass::FieldRead | OpcodeClass::FieldWrite | OpcodeClass::Invoke => {
                let member = pool.member_ref(read_u2(code, pc + 1)?)?;
                instructions.push(Instruction {
                    offset: pc,
                    opcode,
                    class,
                    operand: Operand::Member(member),
                });
            }
            OpcodeClass::CheckCast | OpcodeClass::InstanceOf | OpcodeClass::New => {
                let name = pool.class_name(read_u2(code, pc + 1)?)?;
                instructions.push(Instruction {
                    offset: pc,
                    opcode,
                    class,
                    operand: Operand::Type(name.to_string()),
                });
            }
        }

        pc += length;
    }

    Ok(instructions)
}
