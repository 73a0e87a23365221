//! Struct definition

use ain::Ain;

use crate::common::{CompileError, CompileResult, SemanticErrorKind};
use crate::frontend::ast::TypeSpecifier;

/// Register a struct definition in the struct table
///
/// The name is reserved with an empty member list before the members are
/// looked at, so member types may name the struct being defined. Struct
/// definitions nested in the member list are registered by the same call.
pub fn define_struct(ain: &mut Ain, ty: &mut TypeSpecifier) -> CompileResult<usize> {
    let Some(name) = ty.name.clone() else {
        return Err(CompileError::semantic(
            SemanticErrorKind::AnonymousNotSupported,
            ty.span,
        ));
    };
    if ain.get_struct_no(&name).is_some() {
        return Err(CompileError::semantic(
            SemanticErrorKind::DuplicateDefinition(name),
            ty.span,
        ));
    }

    let struct_no = ain.add_struct(name.as_str());
    ty.struct_no = Some(struct_no);
    log::debug!("defined struct '{}' as #{}", name, struct_no);

    if let Some(members) = &mut ty.members {
        for member in members {
            if member.ty.is_undefined_struct_def() {
                define_struct(ain, &mut member.ty)?;
            }
        }
    }

    Ok(struct_no)
}
