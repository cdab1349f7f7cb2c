//! GLSL stages shared by the backend tests.

/// Reads `Globals`, declares but never reads `Unused`.
pub(crate) const VERTEX: &str = "#version 450
layout(location = 0) in vec3 position;
layout(location = 0) out vec2 uv;

layout(std140, set = 0, binding = 0) uniform Globals {
    mat4 mvp;
    vec4 tint;
};

layout(std140, set = 0, binding = 1) uniform Unused {
    vec4 nothing;
};

void main() {
    uv = tint.xy;
    gl_Position = mvp * vec4(position, 1.0);
}
";

pub(crate) const PIXEL: &str = "#version 450
layout(location = 0) in vec2 uv;
layout(location = 0) out vec4 color;

void main() {
    color = vec4(uv, 0.0, 1.0);
}
";

/// Reads a location the vertex stage never writes.
pub(crate) const PIXEL_WANTS_NORMAL: &str = "#version 450
layout(location = 0) in vec2 uv;
layout(location = 1) in vec3 normal;
layout(location = 0) out vec4 color;

void main() {
    color = vec4(normal * uv.x, 1.0);
}
";

pub(crate) const COMPUTE: &str = "#version 450
layout(local_size_x = 64) in;

layout(std140, set = 0, binding = 0) uniform Params {
    uint count;
    float scale;
};

shared float partial;

void main() {
    partial = scale * float(count);
}
";
