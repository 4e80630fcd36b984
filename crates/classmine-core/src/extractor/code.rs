//! Method bodies: annotations and relation-bearing instructions.

use tracing::debug;

use crate::classfile::{Instruction, MethodInfo, OpcodeClass, Operand};
use crate::error::ExtractError;
use crate::signature::{decode_class_name, MethodSignature};
use crate::sink::FactSink;

use super::annotation::emit_annotation;
use super::context::ExtractionContext;

/// Runs with the method's own frame on top of the scope stack.
pub(crate) fn extract_body<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    method_fqn: &str,
    method: &MethodInfo,
) -> Result<(), ExtractError> {
    for annotation in &method.annotations {
        emit_annotation(ctx, method_fqn, method_fqn, annotation)?;
    }

    for (index, annotations) in method.parameter_annotations.iter().enumerate() {
        let target = format!("{}#{}", method_fqn, index);
        for annotation in annotations {
            emit_annotation(ctx, &target, method_fqn, annotation)?;
        }
    }

    if let Some(code) = &method.code {
        for instruction in code {
            visit_instruction(ctx, instruction)?;
        }
    }
    Ok(())
}

fn visit_instruction<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    instruction: &Instruction,
) -> Result<(), ExtractError> {
    let Some(kind) = instruction.class.relation() else {
        return Ok(());
    };

    let target = match (&instruction.class, &instruction.operand) {
        (OpcodeClass::FieldRead | OpcodeClass::FieldWrite, Operand::Member(field)) => {
            // Compiler-generated accessors (this$0, $assertionsDisabled, ...)
            if field.name.contains('$') {
                return Ok(());
            }
            format!("{}.{}", decode_class_name(&field.owner)?, field.name)
        }
        (OpcodeClass::Invoke, Operand::Member(method)) => {
            let owner = decode_class_name(&method.owner)?;
            MethodSignature::parse(&method.descriptor)?.reference_fqn(&owner, &method.name)
        }
        (_, Operand::Type(name)) => decode_class_name(name)?,
        (_, Operand::Member(member)) => {
            debug!(member = %member.name, opcode = instruction.opcode, "Unexpected member operand");
            return Ok(());
        }
    };

    ctx.relation_from_scope(kind, target)
}
