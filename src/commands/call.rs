use eyre::Result;
use std::path::Path;

use super::load_composition;
use mixkit::config::Config;
use mixkit::registry::{TypeId, TypeRegistry};
use mixkit::value::Value;
use mixkit::wrap::{get_wrap_behavior, wrap_behavior};

fn parse_arg(arg: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(arg)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(arg))
}

/// Construct `ty` with `init` and call `member` with `args`
fn invoke(
    registry: &TypeRegistry,
    ty: TypeId,
    member: &str,
    wrapped: bool,
    init: &[Value],
    args: &[Value],
) -> Result<Value> {
    let instance = registry.construct(ty, init)?;

    if wrapped {
        let wrapper = wrap_behavior(&instance, member);
        if get_wrap_behavior(&instance, member).as_ref() != Some(&wrapper) {
            eyre::bail!("Wrapper for '{}' was not recorded", member);
        }
        wrapper.call(registry, args)
    } else {
        instance.call(registry, member, args)
    }
}

pub fn run(
    manifest: &Path,
    type_name: &str,
    member: &str,
    wrapped: bool,
    init: &[String],
    args: &[String],
    config: &Config,
) -> Result<()> {
    let composition = load_composition(manifest, config)?;
    let ty = composition.type_id(type_name)?;

    let init: Vec<Value> = init.iter().map(|a| parse_arg(a)).collect();
    let args: Vec<Value> = args.iter().map(|a| parse_arg(a)).collect();
    let result = invoke(&composition.registry, ty, member, wrapped, &init, &args)?;

    println!("{}", result);
    Ok(())
}
