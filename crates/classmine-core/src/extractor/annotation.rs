use tracing::debug;

use crate::classfile::{Annotation, ElementValue};
use crate::error::ExtractError;
use crate::ontology::RelationKind;
use crate::signature::decode_type;
use crate::sink::FactSink;

use super::context::ExtractionContext;

/// Emit `AnnotatedBy(target -> type)` plus a `Reads` from `reader` for every
/// enum constant used as a member value.
///
/// `target` and `reader` differ only for parameter annotations, whose target
/// is `method#index`.
pub(crate) fn emit_annotation<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    target: &str,
    reader: &str,
    annotation: &Annotation,
) -> Result<(), ExtractError> {
    let annotation_type = decode_type(&annotation.type_descriptor)?;
    ctx.relation(RelationKind::AnnotatedBy, target, annotation_type)?;

    for (_, value) in &annotation.elements {
        emit_element_value(ctx, reader, value)?;
    }
    Ok(())
}

fn emit_element_value<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    reader: &str,
    value: &ElementValue,
) -> Result<(), ExtractError> {
    match value {
        ElementValue::Enum {
            type_descriptor,
            const_name,
        } => {
            let enum_type = decode_type(type_descriptor)?;
            ctx.relation(
                RelationKind::Reads,
                reader,
                format!("{}.{}", enum_type, const_name),
            )?;
        }
        ElementValue::Array(values) => {
            for value in values {
                emit_element_value(ctx, reader, value)?;
            }
        }
        ElementValue::Annotation(nested) => {
            debug!(annotation = %nested.type_descriptor, "Not descending into nested annotation");
        }
        ElementValue::Const { .. } | ElementValue::Class(_) => {}
    }
    Ok(())
}
