/// Camera and light block shared by the water and model shaders.
const GLOBALS: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_direction: vec4<f32>,
    light_radiance: vec4<f32>,
    ambient_radiance: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;
"#;

/// Vertex-displaced ocean: big sine swell plus a fractal sum of absolute
/// classic Perlin noise, colored by elevation.
const WATER_BODY: &str = r#"
struct Water {
    big_waves_frequency: vec2<f32>,
    time: f32,
    big_waves_elevation: f32,
    big_waves_speed: f32,
    small_waves_elevation: f32,
    small_waves_frequency: f32,
    small_waves_speed: f32,
    small_waves_iterations: u32,
    color_offset: f32,
    color_multiplier: f32,
    _pad: f32,
    depth_color: vec4<f32>,
    surface_color: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> water: Water;

fn mod289_3(x: vec3<f32>) -> vec3<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn mod289_4(x: vec4<f32>) -> vec4<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn permute(x: vec4<f32>) -> vec4<f32> {
    return mod289_4(((x * 34.0) + 1.0) * x);
}

fn taylor_inv_sqrt(r: vec4<f32>) -> vec4<f32> {
    return 1.79284291400159 - 0.85373472095314 * r;
}

fn fade(t: vec3<f32>) -> vec3<f32> {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

// Classic 3D Perlin noise, range about -1..1.
fn cnoise(p: vec3<f32>) -> f32 {
    let pi0 = mod289_3(floor(p));
    let pi1 = mod289_3(floor(p) + vec3<f32>(1.0));
    let pf0 = fract(p);
    let pf1 = pf0 - vec3<f32>(1.0);
    let ix = vec4<f32>(pi0.x, pi1.x, pi0.x, pi1.x);
    let iy = vec4<f32>(pi0.yy, pi1.yy);
    let iz0 = vec4<f32>(pi0.z);
    let iz1 = vec4<f32>(pi1.z);

    let ixy = permute(permute(ix) + iy);
    let ixy0 = permute(ixy + iz0);
    let ixy1 = permute(ixy + iz1);

    var gx0 = ixy0 / 7.0;
    var gy0 = fract(floor(gx0) / 7.0) - 0.5;
    gx0 = fract(gx0);
    let gz0 = vec4<f32>(0.5) - abs(gx0) - abs(gy0);
    let sz0 = step(gz0, vec4<f32>(0.0));
    gx0 = gx0 - sz0 * (step(vec4<f32>(0.0), gx0) - 0.5);
    gy0 = gy0 - sz0 * (step(vec4<f32>(0.0), gy0) - 0.5);

    var gx1 = ixy1 / 7.0;
    var gy1 = fract(floor(gx1) / 7.0) - 0.5;
    gx1 = fract(gx1);
    let gz1 = vec4<f32>(0.5) - abs(gx1) - abs(gy1);
    let sz1 = step(gz1, vec4<f32>(0.0));
    gx1 = gx1 - sz1 * (step(vec4<f32>(0.0), gx1) - 0.5);
    gy1 = gy1 - sz1 * (step(vec4<f32>(0.0), gy1) - 0.5);

    var g000 = vec3<f32>(gx0.x, gy0.x, gz0.x);
    var g100 = vec3<f32>(gx0.y, gy0.y, gz0.y);
    var g010 = vec3<f32>(gx0.z, gy0.z, gz0.z);
    var g110 = vec3<f32>(gx0.w, gy0.w, gz0.w);
    var g001 = vec3<f32>(gx1.x, gy1.x, gz1.x);
    var g101 = vec3<f32>(gx1.y, gy1.y, gz1.y);
    var g011 = vec3<f32>(gx1.z, gy1.z, gz1.z);
    var g111 = vec3<f32>(gx1.w, gy1.w, gz1.w);

    let norm0 = taylor_inv_sqrt(vec4<f32>(dot(g000, g000), dot(g010, g010), dot(g100, g100), dot(g110, g110)));
    g000 = g000 * norm0.x;
    g010 = g010 * norm0.y;
    g100 = g100 * norm0.z;
    g110 = g110 * norm0.w;
    let norm1 = taylor_inv_sqrt(vec4<f32>(dot(g001, g001), dot(g011, g011), dot(g101, g101), dot(g111, g111)));
    g001 = g001 * norm1.x;
    g011 = g011 * norm1.y;
    g101 = g101 * norm1.z;
    g111 = g111 * norm1.w;

    let n000 = dot(g000, pf0);
    let n100 = dot(g100, vec3<f32>(pf1.x, pf0.yz));
    let n010 = dot(g010, vec3<f32>(pf0.x, pf1.y, pf0.z));
    let n110 = dot(g110, vec3<f32>(pf1.xy, pf0.z));
    let n001 = dot(g001, vec3<f32>(pf0.xy, pf1.z));
    let n101 = dot(g101, vec3<f32>(pf1.x, pf0.y, pf1.z));
    let n011 = dot(g011, vec3<f32>(pf0.x, pf1.yz));
    let n111 = dot(g111, pf1);

    let fade_xyz = fade(pf0);
    let n_z = mix(vec4<f32>(n000, n100, n010, n110), vec4<f32>(n001, n101, n011, n111), fade_xyz.z);
    let n_yz = mix(n_z.xy, n_z.zw, fade_xyz.y);
    let n_xyz = mix(n_yz.x, n_yz.y, fade_xyz.x);
    return 2.2 * n_xyz;
}

struct WaterInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct WaterOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) elevation: f32,
};

@vertex
fn vs_water(in: WaterInput) -> WaterOutput {
    var pos = in.position;
    let freq = water.big_waves_frequency;
    let t = water.time;
    let speed = water.big_waves_speed;

    // same swell as the CPU elevation function
    let phase = pos.x - speed * t;
    pos.x = pos.x + freq.x * cos(phase);
    var elevation = freq.y * sin(phase);
    elevation = elevation
        + sin((pos.x * freq.x + t * speed) * 0.5)
        * sin(pos.z * freq.y + t * speed)
        * water.big_waves_elevation;

    for (var i = 1u; i <= water.small_waves_iterations; i = i + 1u) {
        let fi = f32(i);
        let n = cnoise(vec3<f32>(pos.xz * water.small_waves_frequency * fi, t * water.small_waves_speed));
        elevation = elevation - abs(n) * water.small_waves_elevation / fi;
    }
    pos.y = pos.y + elevation;

    var out: WaterOutput;
    out.clip_position = globals.view_proj * vec4<f32>(pos, 1.0);
    out.elevation = elevation;
    return out;
}

@fragment
fn fs_water(in: WaterOutput) -> @location(0) vec4<f32> {
    let strength = (in.elevation + water.color_offset) * water.color_multiplier;
    let color = mix(water.depth_color.rgb, water.surface_color.rgb, strength);
    return vec4<f32>(color, 1.0);
}
"#;

/// Textured, Lambert-lit model.
const MODEL_BODY: &str = r#"
const PI: f32 = 3.14159265358979;

struct Material {
    base_color: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
};

@group(1) @binding(0)
var base_texture: texture_2d<f32>;
@group(1) @binding(1)
var base_sampler: sampler;
@group(1) @binding(2)
var<uniform> material: Material;

@group(2) @binding(0)
var<uniform> object: Object;

struct ModelInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct ModelOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_model(in: ModelInput) -> ModelOutput {
    let world_pos = object.model * vec4<f32>(in.position, 1.0);
    var out: ModelOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_normal = (object.normal * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_model(in: ModelOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(base_texture, base_sampler, in.uv) * material.base_color;
    let n = normalize(in.world_normal);
    let n_dot_l = max(dot(n, globals.light_direction.xyz), 0.0);
    let irradiance = globals.light_radiance.rgb * n_dot_l + globals.ambient_radiance.rgb;
    return vec4<f32>(albedo.rgb / PI * irradiance, albedo.a);
}
"#;

/// Fullscreen triangle copying the resolved scene to the surface.
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var scene_texture: texture_2d<f32>;
@group(0) @binding(1)
var scene_sampler: sampler;

struct BlitOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> BlitOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: BlitOutput;
    out.clip_position = vec4<f32>(uv * vec2<f32>(2.0, -2.0) + vec2<f32>(-1.0, 1.0), 0.0, 1.0);
    out.uv = uv;
    return out;
}

// For sRGB surfaces: the hardware encodes on write.
@fragment
fn fs_blit(in: BlitOutput) -> @location(0) vec4<f32> {
    return textureSample(scene_texture, scene_sampler, in.uv);
}

fn linear_to_srgb(c: vec3<f32>) -> vec3<f32> {
    let low = c * 12.92;
    let high = 1.055 * pow(c, vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(high, low, c <= vec3<f32>(0.0031308));
}

// For linear surfaces: encode by hand.
@fragment
fn fs_blit_encode(in: BlitOutput) -> @location(0) vec4<f32> {
    let c = textureSample(scene_texture, scene_sampler, in.uv);
    return vec4<f32>(linear_to_srgb(c.rgb), c.a);
}
"#;

pub fn water_shader() -> String {
    format!("{GLOBALS}{WATER_BODY}")
}

pub fn model_shader() -> String {
    format!("{GLOBALS}{MODEL_BODY}")
}
