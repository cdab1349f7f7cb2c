use pretty_assertions::assert_eq;

use super::*;

#[test]
fn every_builtin_has_positive_size() {
    for kind in TypeKind::ALL {
        assert!(kind.info().byte_size > 0, "{kind:?} has zero size");
    }
}

#[test]
fn table_rows_match_discriminants() {
    for (index, info) in KIND_TABLE.iter().enumerate() {
        assert_eq!(info.kind as usize, index);
        assert_eq!(TypeKind::ALL[index], info.kind);
    }
}

#[test]
fn signatures_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for info in &KIND_TABLE {
        assert!(seen.insert(info.signature), "duplicate signature {}", info.signature);
    }
}

#[test]
fn backend_names_per_language() {
    let vec3 = DataType::Builtin(TypeKind::Float3);
    assert_eq!(vec3.backend_name(Language::Glsl), "vec3");
    assert_eq!(vec3.backend_name(Language::SpirV), "vec3");
    assert_eq!(vec3.backend_name(Language::Hlsl), "float3");
    assert_eq!(vec3.backend_name(Language::C), "float");

    let mat = DataType::Builtin(TypeKind::Matrix4x4);
    assert_eq!(mat.backend_name(Language::Glsl), "mat4x4");
    assert_eq!(mat.backend_name(Language::Hlsl), "float4x4");
}

#[test]
fn missing_equivalents_use_undefined_sentinel() {
    for kind in [
        TypeKind::Texture2D,
        TypeKind::ImageCube,
        TypeKind::Image2DMS,
        TypeKind::InputAttachment,
    ] {
        assert_eq!(DataType::from(kind).backend_name(Language::Hlsl), UNDEFINED_NAME);
    }
    // String has no shader-side representation at all.
    assert_eq!(
        DataType::from(TypeKind::String).backend_name(Language::Glsl),
        UNDEFINED_NAME
    );
    // Image2DArray maps to an opaque pointer on the host, not to Image2D's row.
    assert_eq!(
        DataType::from(TypeKind::Image2DArray).backend_name(Language::C),
        "void*"
    );
    assert_eq!(
        DataType::from(TypeKind::Image2DArray).backend_name(Language::Hlsl),
        "RWTexture2DArray"
    );
}

#[test]
fn vector_size_and_dimensions() {
    assert_eq!(DataType::from(TypeKind::Float).vector_size(), 1);
    assert_eq!(DataType::from(TypeKind::Integer4).vector_size(), 4);
    assert_eq!(DataType::from(TypeKind::Matrix3x4).vector_size(), 12);
    assert_eq!(DataType::from(TypeKind::Sampler2D).vector_size(), 0);
    assert_eq!(DataType::from(TypeKind::Void).vector_size(), 0);

    assert_eq!(DataType::from(TypeKind::Bool).dimensions(), (1, 1));
    assert_eq!(DataType::from(TypeKind::Double3).dimensions(), (3, 1));
    assert_eq!(DataType::from(TypeKind::Matrix2x3).dimensions(), (2, 3));
    assert_eq!(DataType::from(TypeKind::TextureCube).dimensions(), (0, 0));

    let user = DataType::user("Light").unwrap();
    assert_eq!(user.vector_size(), 0);
    assert_eq!(user.dimensions(), (0, 0));
}

#[test]
fn byte_sizes_of_numeric_kinds() {
    assert_eq!(TypeKind::Float4.info().byte_size, 16);
    assert_eq!(TypeKind::Double2.info().byte_size, 16);
    assert_eq!(TypeKind::Short3.info().byte_size, 6);
    assert_eq!(TypeKind::Bool2.info().byte_size, 2);
    assert_eq!(TypeKind::Matrix4x4.info().byte_size, 64);
    assert_eq!(TypeKind::Matrix3x2.info().byte_size, 24);
}

#[test]
fn primitive_collapses_to_scalar() {
    assert_eq!(
        DataType::from(TypeKind::UInteger3).primitive(),
        DataType::from(TypeKind::UInteger)
    );
    assert_eq!(
        DataType::from(TypeKind::Short2).primitive(),
        DataType::from(TypeKind::Short)
    );
    assert_eq!(
        DataType::from(TypeKind::Bool4).primitive(),
        DataType::from(TypeKind::Bool)
    );
    assert_eq!(
        DataType::from(TypeKind::Matrix2x4).primitive(),
        DataType::from(TypeKind::Float)
    );
    let user = DataType::user("Material").unwrap();
    assert_eq!(user.primitive(), user);
}

#[test]
fn opaque_classification() {
    assert!(TypeKind::Sampler1D.is_opaque());
    assert!(TypeKind::InputAttachmentUIntegerMS.is_opaque());
    assert!(!TypeKind::TextureHandle.is_opaque());
    assert!(TypeKind::TextureHandle.is_handle());
    assert!(!TypeKind::Matrix4x4.is_opaque());
    assert!(TypeKind::Matrix4x4.is_matrix());
    assert!(!TypeKind::Float4.is_matrix());
}

#[test]
fn user_type_requires_name() {
    assert_eq!(DataType::user(""), None);
    assert_eq!(
        DataType::user("Light").and_then(|t| t.user_name().map(str::to_owned)),
        Some("Light".to_owned())
    );
    assert_eq!(DataType::from(TypeKind::Float).user_name(), None);
}

#[test]
fn type_names_are_never_empty() {
    assert_eq!(TypeName::new(""), None);
    assert_eq!(TypeName::new(String::new()), None);

    let name = TypeName::new("Light").unwrap();
    assert_eq!(name.as_str(), "Light");
    assert_eq!(name.to_string(), "Light");
    assert_eq!(name.len(), 5);
    assert_eq!(DataType::UserType(name).user_name(), Some("Light"));
}

#[test]
fn description_is_used_for_display() {
    assert_eq!(
        DataType::from(TypeKind::Float3).to_string(),
        "float vector [3]"
    );
    assert_eq!(DataType::from(TypeKind::Matrix4x4).to_string(), "matrix [4x4]");
    assert_eq!(DataType::user("Light").unwrap().to_string(), "Light");
}
