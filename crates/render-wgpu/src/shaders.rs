use phongview_render::{StructLayout, UniformKind, UniformLayout};

/// Number of point lights the lit shader's array holds. Must match
/// `phongview_render::MAX_POINT_LIGHTS`.
pub const POINT_LIGHT_SLOTS: u32 = 4;

/// WGSL Phong shader: directional light, point light array and a spotlight
/// with a soft cone edge. Materials are flat colours, or colour multipliers
/// over diffuse/specular maps when `useMaps` is set.
pub const LIT_SHADER: &str = r#"
struct Material {
    ambient: vec3<f32>,
    shininess: f32,
    diffuse: vec3<f32>,
    useMaps: i32,
    specular: vec3<f32>,
};

struct DirLight {
    direction: vec3<f32>,
    enabled: i32,
    ambient: vec3<f32>,
    diffuse: vec3<f32>,
    specular: vec3<f32>,
};

struct PointLight {
    position: vec3<f32>,
    constant: f32,
    ambient: vec3<f32>,
    linear: f32,
    diffuse: vec3<f32>,
    quadratic: f32,
    specular: vec3<f32>,
};

struct SpotLight {
    position: vec3<f32>,
    cutOff: f32,
    direction: vec3<f32>,
    outerCutOff: f32,
    ambient: vec3<f32>,
    constant: f32,
    diffuse: vec3<f32>,
    linear: f32,
    specular: vec3<f32>,
    quadratic: f32,
    enabled: i32,
};

struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    viewPos: vec3<f32>,
    pointLightCount: i32,
    material: Material,
    dirLight: DirLight,
    pointLights: array<PointLight, 4>,
    spotLight: SpotLight,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

@group(1) @binding(0)
var diffuseMap: texture_2d<f32>;
@group(1) @binding(1)
var specularMap: texture_2d<f32>;
@group(1) @binding(2)
var mapSampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texCoords: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) fragPos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texCoords: vec2<f32>,
};

struct Surface {
    ambient: vec3<f32>,
    diffuse: vec3<f32>,
    specular: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = u.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = u.projection * u.view * world;
    out.fragPos = world.xyz;
    out.normal = (u.model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.texCoords = vertex.texCoords;
    return out;
}

fn specular_term(lightDir: vec3<f32>, normal: vec3<f32>, viewDir: vec3<f32>) -> f32 {
    let reflectDir = reflect(-lightDir, normal);
    return pow(max(dot(viewDir, reflectDir), 0.0), u.material.shininess);
}

fn attenuation(constant: f32, linear: f32, quadratic: f32, distance: f32) -> f32 {
    return 1.0 / (constant + linear * distance + quadratic * distance * distance);
}

fn dir_light(light: DirLight, normal: vec3<f32>, viewDir: vec3<f32>, s: Surface) -> vec3<f32> {
    let lightDir = normalize(-light.direction);
    let diff = max(dot(normal, lightDir), 0.0);
    let spec = specular_term(lightDir, normal, viewDir);
    return light.ambient * s.ambient + light.diffuse * diff * s.diffuse + light.specular * spec * s.specular;
}

fn point_light(light: PointLight, normal: vec3<f32>, fragPos: vec3<f32>, viewDir: vec3<f32>, s: Surface) -> vec3<f32> {
    let lightDir = normalize(light.position - fragPos);
    let diff = max(dot(normal, lightDir), 0.0);
    let spec = specular_term(lightDir, normal, viewDir);
    let att = attenuation(light.constant, light.linear, light.quadratic, length(light.position - fragPos));
    return (light.ambient * s.ambient + light.diffuse * diff * s.diffuse + light.specular * spec * s.specular) * att;
}

fn spot_light(light: SpotLight, normal: vec3<f32>, fragPos: vec3<f32>, viewDir: vec3<f32>, s: Surface) -> vec3<f32> {
    let lightDir = normalize(light.position - fragPos);
    let diff = max(dot(normal, lightDir), 0.0);
    let spec = specular_term(lightDir, normal, viewDir);
    let att = attenuation(light.constant, light.linear, light.quadratic, length(light.position - fragPos));
    let theta = dot(lightDir, normalize(-light.direction));
    let epsilon = max(light.cutOff - light.outerCutOff, 1e-4);
    let intensity = clamp((theta - light.outerCutOff) / epsilon, 0.0, 1.0);
    return (light.ambient * s.ambient + (light.diffuse * diff * s.diffuse + light.specular * spec * s.specular) * intensity) * att;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let diffuseTex = textureSample(diffuseMap, mapSampler, in.texCoords).rgb;
    let specularTex = textureSample(specularMap, mapSampler, in.texCoords).rgb;

    var s: Surface;
    s.ambient = u.material.ambient;
    s.diffuse = u.material.diffuse;
    s.specular = u.material.specular;
    if (u.material.useMaps != 0) {
        s.ambient = s.ambient * diffuseTex;
        s.diffuse = s.diffuse * diffuseTex;
        s.specular = s.specular * specularTex;
    }

    let normal = normalize(in.normal);
    let viewDir = normalize(u.viewPos - in.fragPos);

    var result = vec3<f32>(0.0);
    if (u.dirLight.enabled != 0) {
        result += dir_light(u.dirLight, normal, viewDir, s);
    }
    let count = clamp(u.pointLightCount, 0, 4);
    for (var i = 0; i < count; i += 1) {
        result += point_light(u.pointLights[i], normal, in.fragPos, viewDir, s);
    }
    if (u.spotLight.enabled != 0) {
        result += spot_light(u.spotLight, normal, in.fragPos, viewDir, s);
    }
    return vec4<f32>(result, 1.0);
}
"#;

/// WGSL shader for the light-indicator cubes: a single flat colour.
pub const LAMP_SHADER: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    lightColor: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return u.projection * u.view * u.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(u.lightColor, 1.0);
}
"#;

fn material_struct() -> StructLayout {
    StructLayout::new()
        .member("ambient", UniformKind::Vec3)
        .member("shininess", UniformKind::Float)
        .member("diffuse", UniformKind::Vec3)
        .member("useMaps", UniformKind::Int)
        .member("specular", UniformKind::Vec3)
}

fn dir_light_struct() -> StructLayout {
    StructLayout::new()
        .member("direction", UniformKind::Vec3)
        .member("enabled", UniformKind::Int)
        .member("ambient", UniformKind::Vec3)
        .member("diffuse", UniformKind::Vec3)
        .member("specular", UniformKind::Vec3)
}

fn point_light_struct() -> StructLayout {
    StructLayout::new()
        .member("position", UniformKind::Vec3)
        .member("constant", UniformKind::Float)
        .member("ambient", UniformKind::Vec3)
        .member("linear", UniformKind::Float)
        .member("diffuse", UniformKind::Vec3)
        .member("quadratic", UniformKind::Float)
        .member("specular", UniformKind::Vec3)
}

fn spot_light_struct() -> StructLayout {
    StructLayout::new()
        .member("position", UniformKind::Vec3)
        .member("cutOff", UniformKind::Float)
        .member("direction", UniformKind::Vec3)
        .member("outerCutOff", UniformKind::Float)
        .member("ambient", UniformKind::Vec3)
        .member("constant", UniformKind::Float)
        .member("diffuse", UniformKind::Vec3)
        .member("linear", UniformKind::Float)
        .member("specular", UniformKind::Vec3)
        .member("quadratic", UniformKind::Float)
        .member("enabled", UniformKind::Int)
}

/// Host-side mirror of the `Uniforms` block in [`LIT_SHADER`].
pub fn lit_layout() -> UniformLayout {
    UniformLayout::builder()
        .member("model", UniformKind::Mat4)
        .member("view", UniformKind::Mat4)
        .member("projection", UniformKind::Mat4)
        .member("viewPos", UniformKind::Vec3)
        .member("pointLightCount", UniformKind::Int)
        .structure("material", &material_struct())
        .structure("dirLight", &dir_light_struct())
        .structure_array("pointLights", POINT_LIGHT_SLOTS, &point_light_struct())
        .structure("spotLight", &spot_light_struct())
        .build()
}

/// Host-side mirror of the `Uniforms` block in [`LAMP_SHADER`].
pub fn lamp_layout() -> UniformLayout {
    UniformLayout::builder()
        .member("model", UniformKind::Mat4)
        .member("view", UniformKind::Mat4)
        .member("projection", UniformKind::Mat4)
        .member("lightColor", UniformKind::Vec3)
        .build()
}
