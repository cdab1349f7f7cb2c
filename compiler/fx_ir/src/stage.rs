use std::fmt;

/// Programmable pipeline stages, in pipeline order.
///
/// The discriminant is the slot index used by program state and by the
/// binary layout, which writes the stages in exactly this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex = 0,
    Hull = 1,
    Domain = 2,
    Geometry = 3,
    Pixel = 4,
    Compute = 5,
}

impl ShaderStage {
    pub const COUNT: usize = 6;

    pub const ALL: [ShaderStage; Self::COUNT] = [
        ShaderStage::Vertex,
        ShaderStage::Hull,
        ShaderStage::Domain,
        ShaderStage::Geometry,
        ShaderStage::Pixel,
        ShaderStage::Compute,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Four-byte ASCII tag that opens this stage's block in a compiled program.
    pub fn tag(self) -> [u8; 4] {
        match self {
            ShaderStage::Vertex => *b"VERT",
            ShaderStage::Hull => *b"HULL",
            ShaderStage::Domain => *b"DOMA",
            ShaderStage::Geometry => *b"GEOM",
            ShaderStage::Pixel => *b"PIXL",
            ShaderStage::Compute => *b"COMP",
        }
    }

    /// Program row key that assigns a function to this stage.
    pub fn row_key(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VertexShader",
            ShaderStage::Hull => "HullShader",
            ShaderStage::Domain => "DomainShader",
            ShaderStage::Geometry => "GeometryShader",
            ShaderStage::Pixel => "PixelShader",
            ShaderStage::Compute => "ComputeShader",
        }
    }

    /// Stage for a program row key, if the key names a stage.
    pub fn from_row_key(key: &str) -> Option<ShaderStage> {
        ShaderStage::ALL
            .into_iter()
            .find(|stage| stage.row_key() == key)
    }

    /// Conventional file extension for generated GLSL of this stage.
    pub fn extension(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Hull => "tesc",
            ShaderStage::Domain => "tese",
            ShaderStage::Geometry => "geom",
            ShaderStage::Pixel => "frag",
            ShaderStage::Compute => "comp",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Hull => "Hull/Control",
            ShaderStage::Domain => "Domain/Evaluation",
            ShaderStage::Geometry => "Geometry",
            ShaderStage::Pixel => "Pixel/Fragment",
            ShaderStage::Compute => "Compute",
        };
        f.write_str(name)
    }
}
