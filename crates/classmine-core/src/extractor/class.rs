//! Per-class-file pass: header, containment, annotations and members.

use tracing::{debug, info, warn};

use crate::classfile::{access, ClassFile, EnclosingMethod};
use crate::error::ExtractError;
use crate::ontology::{EntityFact, EntityKind, RelationKind, DEFAULT_PACKAGE};
use crate::scope::ScopeKind;
use crate::signature::{
    decode_class_name, decode_class_signature, ClassSignatureHandler, FormalTypeParameter,
    MethodSignature,
};
use crate::sink::FactSink;

use super::annotation::emit_annotation;
use super::context::ExtractionContext;
use super::member::{extract_field, extract_method};

const BOOTSTRAP_CLASS: &str = "java/lang/Object";

/// Entity kind for a class header, or `None` for descriptor-only classes.
pub fn classify_class(class: &ClassFile) -> Option<EntityKind> {
    if class.is_descriptor_only() {
        return None;
    }
    let kind = if class.access & access::INTERFACE != 0 {
        if class.access & access::ANNOTATION != 0 {
            EntityKind::Annotation
        } else {
            EntityKind::Interface
        }
    } else if class.access & access::ENUM != 0 {
        EntityKind::Enum
    } else {
        EntityKind::Class
    };
    Some(kind)
}

/// Run one class-file pass. Expects the package frame to be open.
pub fn extract_class<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    class: &ClassFile,
) -> Result<(), ExtractError> {
    let kind = visit_header(ctx, class)?;

    if let Some(enclosing) = &class.enclosing_method {
        visit_outer_class(ctx, enclosing)?;
    }

    if kind.is_some() {
        let fqn = ctx.scope.current_fqn()?.to_string();
        for annotation in &class.annotations {
            emit_annotation(ctx, &fqn, &fqn, annotation)?;
        }
    }

    for name in &class.unknown_attributes {
        info!(class = %class.name, attribute = %name, "Unrecognized class attribute");
    }

    for field in &class.fields {
        extract_field(ctx, field)?;
    }
    for method in &class.methods {
        extract_method(ctx, method)?;
    }

    visit_end(ctx)
}

fn visit_header<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    class: &ClassFile,
) -> Result<Option<EntityKind>, ExtractError> {
    let fqn = decode_class_name(&class.name)?;

    let Some(kind) = classify_class(class) else {
        debug!(class = %class.name, "Descriptor-only class, no entity emitted");
        ctx.scope.push(fqn, ScopeKind::Placeholder);
        return Ok(None);
    };

    ctx.entity(
        EntityFact::new(kind, fqn.clone(), ctx.location.clone())
            .with_name(class.simple_name())
            .with_modifiers(class.access),
    )?;
    ctx.scope.push(fqn.clone(), ScopeKind::Entity(kind));

    match &class.signature {
        None => {
            match &class.super_name {
                Some(super_name) => {
                    ctx.relation(RelationKind::Extends, fqn.clone(), decode_class_name(super_name)?)?;
                }
                None if class.name == BOOTSTRAP_CLASS => {}
                None => warn!(class = %fqn, "Missing supertype"),
            }
            for interface in &class.interfaces {
                ctx.relation(RelationKind::Implements, fqn.clone(), decode_class_name(interface)?)?;
            }
        }
        Some(signature) => {
            let mut handler = ClassDeclaration { ctx, fqn: &fqn };
            decode_class_signature(signature, &mut handler)?;
        }
    }

    Ok(Some(kind))
}

/// Receives a generic class signature and emits its relations.
struct ClassDeclaration<'c, 's, S: FactSink + ?Sized> {
    ctx: &'c mut ExtractionContext<'s, S>,
    fqn: &'c str,
}

impl<S: FactSink + ?Sized> ClassSignatureHandler for ClassDeclaration<'_, '_, S> {
    type Error = ExtractError;

    fn type_parameters(&mut self, params: Vec<FormalTypeParameter>) -> Result<(), ExtractError> {
        for param in params {
            self.ctx
                .relation(RelationKind::ParametrizedBy, self.fqn, param.render())?;
        }
        Ok(())
    }

    fn superclass(&mut self, fqn: String) -> Result<(), ExtractError> {
        self.ctx.relation(RelationKind::Extends, self.fqn, fqn)
    }

    fn interface(&mut self, fqn: String) -> Result<(), ExtractError> {
        self.ctx.relation(RelationKind::Implements, self.fqn, fqn)
    }
}

/// Containment for local and anonymous classes.
fn visit_outer_class<S: FactSink + ?Sized>(
    ctx: &mut ExtractionContext<'_, S>,
    enclosing: &EnclosingMethod,
) -> Result<(), ExtractError> {
    let owner = decode_class_name(&enclosing.owner)?;
    let parent = match (&enclosing.name, &enclosing.descriptor) {
        (Some(name), Some(descriptor)) => {
            MethodSignature::parse(descriptor)?.reference_fqn(&owner, name)
        }
        _ => owner,
    };

    ctx.relation_from_scope(RelationKind::Inside, parent)?;
    ctx.scope.mark_containment_emitted()?;
    Ok(())
}

/// Close the class frame, inferring containment when none was recorded.
///
/// The parent is the FQN truncated at its last `.`; `$`-nested member
/// classes therefore land inside their package, not their outer class.
fn visit_end<S: FactSink + ?Sized>(ctx: &mut ExtractionContext<'_, S>) -> Result<(), ExtractError> {
    let frame = ctx.scope.pop()?;
    if frame.kind == ScopeKind::Placeholder || frame.containment_emitted {
        return Ok(());
    }

    let parent = match frame.fqn.rfind('.') {
        Some(dot) => &frame.fqn[..dot],
        None => DEFAULT_PACKAGE,
    };
    let enclosing = ctx.scope.current_fqn()?;
    if parent != enclosing {
        warn!(
            class = %frame.fqn,
            parent = %parent,
            enclosing = %enclosing,
            "Mismatch between inferred parent and enclosing scope"
        );
    }

    let parent = parent.to_string();
    ctx.relation(RelationKind::Inside, frame.fqn, parent)
}
