//! The builtin kind table.
//!
//! Every builtin kind is declared exactly once in the `kind_table!`
//! invocation below, together with all of its mapped values. The macro
//! expands to both the [`TypeKind`] enum and the [`KIND_TABLE`] array, so a
//! kind cannot exist without a row and a row cannot omit a column.
//!
//! Backends without an equivalent kind use [`UNDEFINED_NAME`] in their
//! column rather than borrowing the name of a neighbouring kind.

/// Backend name used when a target language has no equivalent kind.
pub const UNDEFINED_NAME: &str = "undefined";

/// All mapped values of one builtin kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KindInfo {
    /// The kind this row describes.
    pub kind: TypeKind,
    /// Name in GLSL (also used for the SPIR-V target, which compiles from GLSL).
    pub glsl: &'static str,
    /// Name in HLSL.
    pub hlsl: &'static str,
    /// Host name in C, used by header emission.
    pub c: &'static str,
    /// Short mangled token used to build overload keys.
    pub signature: &'static str,
    /// Human-readable description for diagnostics.
    pub description: &'static str,
    /// Number of scalar components, 0 for opaque and non-data kinds.
    pub components: u32,
    /// Host representation size in bytes.
    pub byte_size: u32,
    /// `(rows, cols)`; `(1, 1)` for scalars and `(0, 0)` for non-numeric kinds.
    pub dimensions: (u32, u32),
    /// Scalar element kind after collapsing vectors and matrices.
    pub primitive: TypeKind,
}

macro_rules! kind_table {
    (
        $(
            $kind:ident => [
                $glsl:literal, $hlsl:literal, $c:literal, $sig:literal, $desc:literal,
                $components:literal, $size:expr, ($rows:literal, $cols:literal), $prim:ident
            ]
        ),* $(,)?
    ) => {
        /// Builtin data type kinds, in declaration order of the kind table.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum TypeKind {
            $($kind,)*
        }

        impl TypeKind {
            /// Number of builtin kinds.
            pub const COUNT: usize = [$(stringify!($kind)),*].len();

            /// Every builtin kind, in table order.
            pub const ALL: [TypeKind; Self::COUNT] = [$(TypeKind::$kind,)*];
        }

        /// One row per builtin kind, indexed by `TypeKind as usize`.
        pub const KIND_TABLE: [KindInfo; TypeKind::COUNT] = [
            $(
                KindInfo {
                    kind: TypeKind::$kind,
                    glsl: $glsl,
                    hlsl: $hlsl,
                    c: $c,
                    signature: $sig,
                    description: $desc,
                    components: $components,
                    byte_size: $size,
                    dimensions: ($rows, $cols),
                    primitive: TypeKind::$prim,
                },
            )*
        ];
    };
}

const F32: u32 = 4;
const F64: u32 = 8;
const I32: u32 = 4;
const I16: u32 = 2;
const BOOL: u32 = 1;
/// Opaque resources and handles are carried as a host integer.
const HANDLE: u32 = 4;

kind_table! {
    // kind => [glsl, hlsl, c, signature, description, components, bytes, (rows, cols), primitive]
    Float => ["float", "float", "float", "f", "float", 1, F32, (1, 1), Float],
    Float2 => ["vec2", "float2", "float", "f2", "float vector [2]", 2, 2 * F32, (2, 1), Float],
    Float3 => ["vec3", "float3", "float", "f3", "float vector [3]", 3, 3 * F32, (3, 1), Float],
    Float4 => ["vec4", "float4", "float", "f4", "float vector [4]", 4, 4 * F32, (4, 1), Float],
    Double => ["double", "double", "double", "d", "double", 1, F64, (1, 1), Double],
    Double2 => ["dvec2", "double2", "double", "d2", "double vector [2]", 2, 2 * F64, (2, 1), Double],
    Double3 => ["dvec3", "double3", "double", "d3", "double vector [3]", 3, 3 * F64, (3, 1), Double],
    Double4 => ["dvec4", "double4", "double", "d4", "double vector [4]", 4, 4 * F64, (4, 1), Double],
    Integer => ["int", "int", "int", "i", "int", 1, I32, (1, 1), Integer],
    Integer2 => ["ivec2", "int2", "int", "i2", "int vector [2]", 2, 2 * I32, (2, 1), Integer],
    Integer3 => ["ivec3", "int3", "int", "i3", "int vector [3]", 3, 3 * I32, (3, 1), Integer],
    Integer4 => ["ivec4", "int4", "int", "i4", "int vector [4]", 4, 4 * I32, (4, 1), Integer],
    UInteger => ["uint", "uint", "unsigned int", "ui", "unsigned int", 1, I32, (1, 1), UInteger],
    UInteger2 => ["uvec2", "uint2", "unsigned int", "ui2", "unsigned int vector [2]", 2, 2 * I32, (2, 1), UInteger],
    UInteger3 => ["uvec3", "uint3", "unsigned int", "ui3", "unsigned int vector [3]", 3, 3 * I32, (3, 1), UInteger],
    UInteger4 => ["uvec4", "uint4", "unsigned int", "ui4", "unsigned int vector [4]", 4, 4 * I32, (4, 1), UInteger],
    Short => ["short", "short", "short", "s", "short", 1, I16, (1, 1), Short],
    Short2 => ["svec2", "short2", "short", "s2", "short vector [2]", 2, 2 * I16, (2, 1), Short],
    Short3 => ["svec3", "short3", "short", "s3", "short vector [3]", 3, 3 * I16, (3, 1), Short],
    Short4 => ["svec4", "short4", "short", "s4", "short vector [4]", 4, 4 * I16, (4, 1), Short],
    Bool => ["bool", "bool", "bool", "b", "bool", 1, BOOL, (1, 1), Bool],
    Bool2 => ["bvec2", "bool2", "bool", "b2", "bool vector [2]", 2, 2 * BOOL, (2, 1), Bool],
    Bool3 => ["bvec3", "bool3", "bool", "b3", "bool vector [3]", 3, 3 * BOOL, (3, 1), Bool],
    Bool4 => ["bvec4", "bool4", "bool", "b4", "bool vector [4]", 4, 4 * BOOL, (4, 1), Bool],

    Matrix2x2 => ["mat2x2", "float2x2", "float", "m22", "matrix [2x2]", 4, 4 * F32, (2, 2), Float],
    Matrix2x3 => ["mat2x3", "float2x3", "float", "m23", "matrix [2x3]", 6, 6 * F32, (2, 3), Float],
    Matrix2x4 => ["mat2x4", "float2x4", "float", "m24", "matrix [2x4]", 8, 8 * F32, (2, 4), Float],
    Matrix3x2 => ["mat3x2", "float3x2", "float", "m32", "matrix [3x2]", 6, 6 * F32, (3, 2), Float],
    Matrix3x3 => ["mat3x3", "float3x3", "float", "m33", "matrix [3x3]", 9, 9 * F32, (3, 3), Float],
    Matrix3x4 => ["mat3x4", "float3x4", "float", "m34", "matrix [3x4]", 12, 12 * F32, (3, 4), Float],
    Matrix4x2 => ["mat4x2", "float4x2", "float", "m42", "matrix [4x2]", 8, 8 * F32, (4, 2), Float],
    Matrix4x3 => ["mat4x3", "float4x3", "float", "m43", "matrix [4x3]", 12, 12 * F32, (4, 3), Float],
    Matrix4x4 => ["mat4x4", "float4x4", "float", "m44", "matrix [4x4]", 16, 16 * F32, (4, 4), Float],

    Sampler1D => ["sampler1D", "Texture1D", "void*", "sam1d", "texture sampler [1D]", 0, HANDLE, (0, 0), Integer],
    Sampler1DArray => ["sampler1DArray", "Texture1DArray", "void*", "sam1da", "texture sampler [1D-Array]", 0, HANDLE, (0, 0), Integer],
    Sampler2D => ["sampler2D", "Texture2D", "void*", "sam2d", "texture sampler [2D]", 0, HANDLE, (0, 0), Integer],
    Sampler2DArray => ["sampler2DArray", "Texture2DArray", "void*", "sam2da", "texture sampler [2D-Array]", 0, HANDLE, (0, 0), Integer],
    Sampler2DMS => ["sampler2DMS", "Texture2DMS", "void*", "sam2dms", "texture sampler [2D-Multisample]", 0, HANDLE, (0, 0), Integer],
    Sampler2DMSArray => ["sampler2DMSArray", "Texture2DMSArray", "void*", "sam2dmsa", "texture sampler [2D-Multisample-Array]", 0, HANDLE, (0, 0), Integer],
    Sampler3D => ["sampler3D", "Texture3D", "void*", "sam3d", "texture sampler [3D]", 0, HANDLE, (0, 0), Integer],
    SamplerCube => ["samplerCube", "TextureCube", "void*", "samc", "texture sampler [Cube]", 0, HANDLE, (0, 0), Integer],
    SamplerCubeArray => ["samplerCubeArray", "TextureCubeArray", "void*", "samca", "texture sampler [Cube-Array]", 0, HANDLE, (0, 0), Integer],

    Image1D => ["image1D", "RWTexture1D", "void*", "ima1d", "image [1D]", 0, HANDLE, (0, 0), Integer],
    Image1DArray => ["image1DArray", "RWTexture1DArray", "void*", "ima1da", "image [1D-Array]", 0, HANDLE, (0, 0), Integer],
    Image2D => ["image2D", "RWTexture2D", "void*", "ima2d", "image [2D]", 0, HANDLE, (0, 0), Integer],
    Image2DArray => ["image2DArray", "RWTexture2DArray", "void*", "ima2da", "image [2D-Array]", 0, HANDLE, (0, 0), Integer],
    Image2DMS => ["image2DMS", "undefined", "void*", "ima2dms", "image [2D-Multisample]", 0, HANDLE, (0, 0), Integer],
    Image2DMSArray => ["image2DMSArray", "undefined", "void*", "ima2dmsa", "image [2D-Multisample-Array]", 0, HANDLE, (0, 0), Integer],
    Image3D => ["image3D", "RWTexture3D", "void*", "ima3d", "image [3D]", 0, HANDLE, (0, 0), Integer],
    ImageCube => ["imageCube", "undefined", "void*", "imac", "image [Cube]", 0, HANDLE, (0, 0), Integer],
    ImageCubeArray => ["imageCubeArray", "undefined", "void*", "imaca", "image [Cube-Array]", 0, HANDLE, (0, 0), Integer],

    // HLSL spells separate textures the way it spells combined samplers, so
    // these have no distinct HLSL name.
    Texture1D => ["texture1D", "undefined", "void*", "tex1d", "texture [1D]", 0, HANDLE, (0, 0), Integer],
    Texture1DArray => ["texture1DArray", "undefined", "void*", "tex1da", "texture [1D-Array]", 0, HANDLE, (0, 0), Integer],
    Texture2D => ["texture2D", "undefined", "void*", "tex2d", "texture [2D]", 0, HANDLE, (0, 0), Integer],
    Texture2DArray => ["texture2DArray", "undefined", "void*", "tex2da", "texture [2D-Array]", 0, HANDLE, (0, 0), Integer],
    Texture2DMS => ["texture2DMS", "undefined", "void*", "tex2dms", "texture [2D-Multisample]", 0, HANDLE, (0, 0), Integer],
    Texture2DMSArray => ["texture2DMSArray", "undefined", "void*", "tex2dmsa", "texture [2D-Multisample-Array]", 0, HANDLE, (0, 0), Integer],
    Texture3D => ["texture3D", "undefined", "void*", "tex3d", "texture [3D]", 0, HANDLE, (0, 0), Integer],
    TextureCube => ["textureCube", "undefined", "void*", "texc", "texture [Cube]", 0, HANDLE, (0, 0), Integer],
    TextureCubeArray => ["textureCubeArray", "undefined", "void*", "texca", "texture [Cube-Array]", 0, HANDLE, (0, 0), Integer],

    InputAttachment => ["subpassInput", "undefined", "void*", "ia", "input attachment", 0, HANDLE, (0, 0), Integer],
    InputAttachmentMS => ["subpassInputMS", "undefined", "void*", "iams", "input attachment [Multisample]", 0, HANDLE, (0, 0), Integer],
    InputAttachmentInteger => ["isubpassInput", "undefined", "void*", "iai", "input attachment [Integer]", 0, HANDLE, (0, 0), Integer],
    InputAttachmentIntegerMS => ["isubpassInputMS", "undefined", "void*", "iaims", "input attachment [Integer multisample]", 0, HANDLE, (0, 0), Integer],
    InputAttachmentUInteger => ["usubpassInput", "undefined", "void*", "iau", "input attachment [Unsigned integer]", 0, HANDLE, (0, 0), Integer],
    InputAttachmentUIntegerMS => ["usubpassInputMS", "undefined", "void*", "iaums", "input attachment [Unsigned integer multisample]", 0, HANDLE, (0, 0), Integer],

    TextureHandle => ["uint", "uint", "unsigned int", "th", "texture handle [uint]", 1, HANDLE, (1, 1), UInteger],
    ImageHandle => ["uint", "uint", "unsigned int", "ih", "image handle [uint]", 1, HANDLE, (1, 1), UInteger],
    SamplerHandle => ["uint", "uint", "unsigned int", "sh", "sampler handle [uint]", 1, HANDLE, (1, 1), UInteger],

    Void => ["void", "void", "void", "v", "void", 0, HANDLE, (0, 0), Integer],
    String => ["undefined", "undefined", "const char*", "str", "string", 0, HANDLE, (0, 0), Integer],
    Undefined => ["undefined", "undefined", "void*", "undefined", "undefined", 0, HANDLE, (0, 0), Integer],
}

static ROWS: [KindInfo; TypeKind::COUNT] = KIND_TABLE;

impl TypeKind {
    /// The table row for this kind.
    #[inline]
    pub fn info(self) -> &'static KindInfo {
        &ROWS[self as usize]
    }

    /// Whether this kind is an opaque GPU resource (sampler, image, texture,
    /// or input attachment).
    pub const fn is_opaque(self) -> bool {
        (self as u8) >= (TypeKind::Sampler1D as u8) && (self as u8) <= (TypeKind::InputAttachmentUIntegerMS as u8)
    }

    /// Whether this kind is an integer-encoded resource handle.
    pub const fn is_handle(self) -> bool {
        matches!(
            self,
            TypeKind::TextureHandle | TypeKind::ImageHandle | TypeKind::SamplerHandle
        )
    }

    /// Whether this kind is a matrix.
    pub const fn is_matrix(self) -> bool {
        (self as u8) >= (TypeKind::Matrix2x2 as u8) && (self as u8) <= (TypeKind::Matrix4x4 as u8)
    }
}

// Table rows must line up with their discriminants; `info()` indexes by them.
const _: () = {
    let mut i = 0;
    while i < TypeKind::COUNT {
        assert!(KIND_TABLE[i].kind as usize == i);
        assert!(KIND_TABLE[i].byte_size > 0);
        i += 1;
    }
};
