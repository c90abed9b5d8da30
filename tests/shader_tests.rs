//! Validation of the hair shader against the CPU-side uniform layouts.

use hairsim::render::{GlobalUniforms, GuideVertexGpu, HairUniforms, StrandRange, HAIR_SHADER};

fn parse() -> naga::Module {
    naga::front::wgsl::parse_str(HAIR_SHADER)
        .unwrap_or_else(|e| panic!("WGSL parse error: {}", e.emit_to_string(HAIR_SHADER)))
}

fn validate(module: &naga::Module) -> Result<naga::valid::ModuleInfo, String> {
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))
}

fn struct_size(module: &naga::Module, name: &str) -> u32 {
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("struct {name} missing from shader"));
    match ty.inner {
        naga::TypeInner::Struct { span, .. } => span,
        ref other => panic!("{name} is not a struct: {other:?}"),
    }
}

#[test]
fn test_hair_shader_is_valid() {
    let module = parse();
    validate(&module).expect("hair shader should be valid");
}

#[test]
fn test_entry_points() {
    let module = parse();
    let stages: Vec<(&str, naga::ShaderStage)> = module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect();
    assert!(stages.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(stages.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn test_struct_layouts_match_rust() {
    let module = parse();
    assert_eq!(struct_size(&module, "Globals") as usize, std::mem::size_of::<GlobalUniforms>());
    assert_eq!(struct_size(&module, "HairParams") as usize, std::mem::size_of::<HairUniforms>());
    assert_eq!(struct_size(&module, "GuideVertex") as usize, std::mem::size_of::<GuideVertexGpu>());
    assert_eq!(struct_size(&module, "StrandRange") as usize, std::mem::size_of::<StrandRange>());
}

#[test]
fn test_bindings() {
    let module = parse();
    let mut bindings: Vec<u32> = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| var.binding.as_ref())
        .map(|b| {
            assert_eq!(b.group, 0);
            b.binding
        })
        .collect();
    bindings.sort_unstable();
    assert_eq!(bindings, vec![0, 1, 2, 3]);
}
