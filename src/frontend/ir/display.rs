//! Rendering types and variables for diagnostics and hover text.
//!
//! ## Examples
//!
//! | Type                              | Rendering            |
//! |-----------------------------------|----------------------|
//! | `List` with no argument           | `List`               |
//! | `Union[Number, nil]`              | `Number?`            |
//! | function `(a Number) -> String`   | `Function[Number,String]` |
//! | generic function                  | `def[T](x T)T`       |

use std::fmt;

use mtots_core::numeric::format_number;

use super::store::{FunctionType, TypeData, TypeId, Types};
use super::{ConstValue, Parameter, Variable};

/// [`fmt::Display`] adapter for a type in an arena.
pub struct DisplayType<'a> {
    types: &'a Types,
    id: TypeId,
}

impl Types {
    pub fn display(&self, id: TypeId) -> DisplayType<'_> {
        DisplayType { types: self, id }
    }

    pub fn render(&self, id: TypeId) -> String {
        self.display(id).to_string()
    }
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types;
        let show = |id: TypeId| types.display(id);
        match types.get(self.id) {
            TypeData::Any => f.write_str("Any"),
            TypeData::Never => f.write_str("Never"),
            TypeData::Primitive(primitive) => f.write_str(primitive.name),
            TypeData::Literal(literal) => write!(f, "{}", show(literal.primitive)),
            TypeData::PrimitiveTypeType(primitive) => write!(f, "class {}", show(*primitive)),
            TypeData::Module(module) => write!(f, "import {}", module.name),
            TypeData::Instance(instance) => f.write_str(&instance.identifier.name),
            TypeData::BoundInstance(bound) => {
                write!(f, "{}[", show(bound.instance))?;
                write_joined(f, bound.args.iter().map(|a| show(*a)), ", ")?;
                f.write_str("]")
            }
            TypeData::ClassType(instance) => write!(f, "class {}", show(*instance)),
            TypeData::ClassTypeType => f.write_str("Class"),
            TypeData::TypeVariable(variable) => f.write_str(&variable.identifier.name),
            TypeData::TypeVariableType(variable) => write!(f, "typevar {}", show(*variable)),
            TypeData::Iteration(item) => write!(f, "Iteration[{}]", show(*item)),
            TypeData::Iterable(item) => write!(f, "Iterable[{}]", show(*item)),
            TypeData::List(_) if self.id == TypeId::UNTYPED_LIST => f.write_str("List"),
            TypeData::List(item) => write!(f, "List[{}]", show(*item)),
            TypeData::FrozenList(item) => write!(f, "FrozenList[{}]", show(*item)),
            TypeData::Tuple(items) => {
                f.write_str("Tuple[")?;
                write_joined(f, items.iter().map(|i| show(*i)), ", ")?;
                f.write_str("]")
            }
            TypeData::Dict(key, value) => write!(f, "Dict[{}, {}]", show(*key), show(*value)),
            TypeData::FrozenDict(key, value) => write!(f, "FrozenDict[{}, {}]", show(*key), show(*value)),
            TypeData::FrozenDictLiteral(literal) => write!(f, "{}", show(literal.backing)),
            TypeData::Function(function) => fmt_function(types, function, f),
            TypeData::Union(members) => {
                let present: Vec<TypeId> = members.iter().copied().filter(|m| *m != TypeId::NIL).collect();
                write_joined(f, present.iter().map(|m| show(*m)), "|")?;
                if present.len() < members.len() {
                    f.write_str("?")?;
                }
                Ok(())
            }
        }
    }
}

fn fmt_function(types: &Types, function: &FunctionType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if function.is_generic() {
        f.write_str("def[")?;
        write_joined(f, function.type_parameters.iter().map(|tp| types.display(*tp)), ",")?;
        f.write_str("](")?;
        write_joined(
            f,
            function
                .parameters
                .iter()
                .map(|p| format!("{} {}", p.identifier.name, types.display(p.type_id))),
            ",",
        )?;
        write!(f, "){}", types.display(function.return_type))
    } else if function.parameters.is_empty() {
        write!(f, "Function[{}]", types.display(function.return_type))
    } else {
        f.write_str("Function[")?;
        write_joined(f, function.parameters.iter().map(|p| types.display(p.type_id)), ",")?;
        write!(f, ",{}]", types.display(function.return_type))
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// ============================================================================
// Constants and variables
// ============================================================================

/// Render a constant the way it appears as a parameter default (`nil`, `"s"`, `true`, `1.5`).
pub fn render_const(value: &ConstValue) -> String {
    match value {
        ConstValue::Nil => "nil".to_string(),
        ConstValue::Bool(b) => b.to_string(),
        ConstValue::Number(n) => format_number(*n),
        ConstValue::String(s) => serde_json::Value::String(s.clone()).to_string(),
    }
}

/// Render a constant as a JSON value, as hover text shows literal initializers.
fn render_json(value: &ConstValue) -> String {
    match value {
        ConstValue::Nil => "null".to_string(),
        other => render_const(other),
    }
}

fn render_parameter(types: &Types, parameter: &Parameter) -> String {
    let mut out = format!("{} {}", parameter.identifier.name, types.display(parameter.type_id));
    if let Some(default) = &parameter.default {
        out.push('=');
        out.push_str(&render_const(default));
    }
    out
}

/// One-line hover text for a binding.
///
/// ## Examples
/// - `class Foo`, `import util`
/// - `def get[T](xs List[T], i Number=0) T`
/// - `final LIMIT Number = 10`, `var name String`
pub fn format_variable(types: &Types, variable: &Variable) -> String {
    let name = variable.name();
    let keyword = if variable.is_final { "final" } else { "var" };
    match types.get(variable.type_id) {
        TypeData::ClassType(instance) => format!("class {}", types.display(*instance)),
        TypeData::Module(module) => format!("import {}", module.name),
        TypeData::Function(function) => {
            let type_parameters = if function.is_generic() {
                let names: Vec<String> = function.type_parameters.iter().map(|tp| types.render(*tp)).collect();
                format!("[{}]", names.join(","))
            } else {
                String::new()
            };
            let parameters: Vec<String> = function.parameters.iter().map(|p| render_parameter(types, p)).collect();
            format!(
                "def {name}{type_parameters}({}) {}",
                parameters.join(", "),
                types.display(function.return_type)
            )
        }
        TypeData::Literal(literal) => format!(
            "{keyword} {name} {} = {}",
            types.display(variable.type_id),
            render_json(&literal.value)
        ),
        _ => format!("{keyword} {name} {}", types.display(variable.type_id)),
    }
}
