/// Declarative shader source generator
///
/// Builds a complete vertex + fragment pair from an ordered attribute list:
///
/// - **Visualization mode** (`vertex_attribute_shader`): the fragment stage
///   shows one attribute as a color, picked at runtime by an `int` selector
///   uniform (`case i` shows attribute `i`).
/// - **Texture mode** (`texture_shader`): the fragment stage shows one
///   texture, sampled at a texcoord, sphere-map or reflection coordinate.
///
/// All inputs are validated before any text is produced.
///
/// ```ignore
/// let shader = generate_vertex_attribute_shader(&[
///     AttributeDescriptor::float("position", 3).with_usage(AttributeUsage::Position),
///     AttributeDescriptor::float("normal", 3)
///         .with_usage(AttributeUsage::Normal)
///         .with_display(AttributeDisplay::NORMALIZE | AttributeDisplay::REMAP_SIGNED),
/// ])?;
/// let vertex = Shader::compile(&registry, &mut device, ShaderStage::Vertex, &shader.vertex)?;
/// ```

use rustc_hash::FxHashSet;

use crate::engine_error;
use crate::error::{Error, Result};
use crate::graphics_device::ScalarKind;
use crate::shader_gen::widen::{float_literal, widen};
use crate::shader_gen::{AttributeDescriptor, AttributeDisplay, AttributeUsage, TextureDescriptor, UvSource};

// ===== CONFIGURATION =====

/// Names and constants used in generated source
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderGenConfig {
    /// First line of both stages
    pub version: String,
    /// Prefix of vertex outputs / fragment inputs
    pub output_prefix: String,
    /// `mat4` clip-space transform
    pub matrix_uniform: String,
    /// `mat4` model-view transform (texture mode with sphere / cube lookups only)
    pub view_matrix_uniform: String,
    /// `int` selecting the displayed case
    pub selector_uniform: String,
    /// `vec4` fragment output
    pub fragment_output: String,
    /// Padding value when widening
    pub fill: f32,
}

impl Default for ShaderGenConfig {
    fn default() -> Self {
        Self {
            version: "#version 330 core".to_string(),
            output_prefix: "v_".to_string(),
            matrix_uniform: "u_matrix".to_string(),
            view_matrix_uniform: "u_view_matrix".to_string(),
            selector_uniform: "u_selector".to_string(),
            fragment_output: "frag_color".to_string(),
            fill: 1.0,
        }
    }
}

/// Generated source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedShader {
    pub vertex: String,
    pub fragment: String,
}

// ===== VALIDATION =====

/// GLSL 3.30 / ES 3.00 keywords and reserved words, plus the entry point and
/// the built-in functions generated sources call
const RESERVED_WORDS: &[&str] = &[
    // keywords
    "attribute", "const", "uniform", "varying", "layout", "centroid", "flat", "smooth",
    "noperspective", "break", "continue", "do", "for", "while", "switch", "case", "default",
    "if", "else", "in", "out", "inout", "float", "int", "void", "bool", "true", "false",
    "invariant", "discard", "return", "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4",
    "mat3x2", "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4", "vec2", "vec3", "vec4",
    "ivec2", "ivec3", "ivec4", "bvec2", "bvec3", "bvec4", "uint", "uvec2", "uvec3", "uvec4",
    "lowp", "mediump", "highp", "precision", "struct",
    "sampler1D", "sampler2D", "sampler3D", "samplerCube", "sampler1DShadow",
    "sampler2DShadow", "samplerCubeShadow", "sampler1DArray", "sampler2DArray",
    "sampler1DArrayShadow", "sampler2DArrayShadow", "isampler1D", "isampler2D", "isampler3D",
    "isamplerCube", "isampler1DArray", "isampler2DArray", "usampler1D", "usampler2D",
    "usampler3D", "usamplerCube", "usampler1DArray", "usampler2DArray", "sampler2DRect",
    "sampler2DRectShadow", "isampler2DRect", "usampler2DRect", "samplerBuffer",
    "isamplerBuffer", "usamplerBuffer", "sampler2DMS", "isampler2DMS", "usampler2DMS",
    "sampler2DMSArray", "isampler2DMSArray", "usampler2DMSArray",
    // reserved for future use
    "common", "partition", "active", "asm", "class", "union", "enum", "typedef", "template",
    "this", "packed", "goto", "inline", "noinline", "volatile", "public", "static", "extern",
    "external", "interface", "long", "short", "double", "half", "fixed", "unsigned",
    "superp", "input", "output", "hvec2", "hvec3", "hvec4", "dvec2", "dvec3", "dvec4",
    "fvec2", "fvec3", "fvec4", "sampler3DRect", "filter", "image1D", "image2D", "image3D",
    "imageCube", "iimage1D", "iimage2D", "iimage3D", "iimageCube", "uimage1D", "uimage2D",
    "uimage3D", "uimageCube", "image1DArray", "image2DArray", "iimage1DArray",
    "iimage2DArray", "uimage1DArray", "uimage2DArray", "image1DShadow", "image2DShadow",
    "image1DArrayShadow", "image2DArrayShadow", "imageBuffer", "iimageBuffer",
    "uimageBuffer", "sizeof", "cast", "namespace", "using", "row_major",
    // entry point and built-ins used by generated code
    "main", "texture", "normalize", "reflect",
];

/// GLSL identifier, not reserved (keywords, `gl_` prefix, `__`)
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("gl_")
        && !name.contains("__")
        && !RESERVED_WORDS.contains(&name)
}

fn invalid_attribute(message: String) -> Error {
    engine_error!("galaxy3d::ShaderGenerator", "Invalid attribute: {}", message);
    Error::InvalidAttribute(message)
}

fn invalid_texture(message: String) -> Error {
    engine_error!("galaxy3d::ShaderGenerator", "Invalid texture: {}", message);
    Error::InvalidTexture(message)
}

fn missing_usage(usage: AttributeUsage, required_by: String) -> Error {
    engine_error!("galaxy3d::ShaderGenerator",
        "Missing attribute with usage '{}' (required by {})", usage, required_by);
    Error::MissingAttributeUsage { usage, required_by }
}

/// Check an attribute list on its own
///
/// # Errors
///
/// - `EmptyAttributeList` for an empty list
/// - `InvalidAttribute` for a component count outside 1-4, a boolean base
///   type, a name that is not a usable GLSL identifier, or a duplicate name
pub fn validate_attributes(attributes: &[AttributeDescriptor]) -> Result<()> {
    if attributes.is_empty() {
        engine_error!("galaxy3d::ShaderGenerator",
            "Invalid attribute list: at least one attribute descriptor is required");
        return Err(Error::EmptyAttributeList);
    }

    let mut names = FxHashSet::default();
    for (index, attribute) in attributes.iter().enumerate() {
        if !(1..=4).contains(&attribute.components) {
            return Err(invalid_attribute(format!(
                "attribute {} ('{}'): component count {} is outside 1-4",
                index, attribute.name, attribute.components
            )));
        }
        if attribute.base_type == ScalarKind::Bool {
            return Err(invalid_attribute(format!(
                "attribute {} ('{}'): bool is not a vertex attribute type", index, attribute.name
            )));
        }
        if !is_identifier(&attribute.name) {
            return Err(invalid_attribute(format!(
                "attribute {}: '{}' is not a valid GLSL identifier", index, attribute.name
            )));
        }
        if !names.insert(attribute.name.as_str()) {
            return Err(invalid_attribute(format!("duplicate attribute name '{}'", attribute.name)));
        }
    }
    Ok(())
}

/// Attribute used for the clip-space transform
///
/// The position-tagged attribute if there is one, otherwise the first one.
pub fn position_attribute(attributes: &[AttributeDescriptor]) -> Option<&AttributeDescriptor> {
    attributes
        .iter()
        .find(|attribute| attribute.usage == AttributeUsage::Position)
        .or_else(|| attributes.first())
}

fn find_usage(attributes: &[AttributeDescriptor], usage: AttributeUsage) -> Option<&AttributeDescriptor> {
    attributes.iter().find(|attribute| attribute.usage == usage)
}

/// Identifiers already used by the generated stages
struct Names<'a> {
    taken: FxHashSet<String>,
    config: &'a ShaderGenConfig,
}

impl<'a> Names<'a> {
    fn new(config: &'a ShaderGenConfig) -> Self {
        Self { taken: FxHashSet::default(), config }
    }

    fn claim(&mut self, name: String, on_conflict: impl FnOnce(String) -> Error) -> Result<()> {
        if self.taken.insert(name.clone()) {
            Ok(())
        } else {
            Err(on_conflict(format!("'{}' collides with another generated identifier", name)))
        }
    }

    fn claim_attributes(&mut self, attributes: &[AttributeDescriptor]) -> Result<()> {
        let config = self.config;
        for attribute in attributes {
            self.claim(attribute.name.clone(), invalid_attribute)?;
        }
        for attribute in attributes {
            self.claim(config.output(&attribute.name), invalid_attribute)?;
        }
        Ok(())
    }
}

impl ShaderGenConfig {
    fn output(&self, name: &str) -> String {
        format!("{}{}", self.output_prefix, name)
    }

    fn view_normal(&self) -> String {
        self.output("view_normal")
    }

    fn view_position(&self) -> String {
        self.output("view_position")
    }

    fn validate(&self) -> Result<()> {
        let fail = |message: String| {
            engine_error!("galaxy3d::ShaderGenerator", "Invalid generator config: {}", message);
            Err(Error::InitializationFailed(message))
        };
        if !self.version.starts_with("#version") {
            return fail(format!("version line '{}' must start with #version", self.version));
        }
        if !self.fill.is_finite() {
            return fail(format!("fill value {} is not finite", self.fill));
        }
        // an empty prefix would make every output collide with its input
        if !is_identifier(&self.output_prefix) {
            return fail(format!("output prefix '{}' is not a valid identifier", self.output_prefix));
        }
        for name in [
            &self.matrix_uniform,
            &self.view_matrix_uniform,
            &self.selector_uniform,
            &self.fragment_output,
        ] {
            if !is_identifier(name) {
                return fail(format!("'{}' is not a valid GLSL identifier", name));
            }
        }
        Ok(())
    }
}

// ===== SOURCE TEXT =====

/// Line-oriented source builder (4-space indentation)
#[derive(Default)]
struct Source {
    text: String,
}

impl Source {
    fn line(&mut self, indent: usize, line: &str) {
        for _ in 0..indent {
            self.text.push_str("    ");
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }
}

/// `flat ` for integer varyings, nothing otherwise
fn interpolation(attribute: &AttributeDescriptor) -> &'static str {
    if attribute.is_integer() { "flat " } else { "" }
}

fn glsl_type_name(attribute: &AttributeDescriptor) -> String {
    attribute
        .glsl_type()
        .map(|ty| ty.glsl_name().into_owned())
        .unwrap_or_else(|| "float".to_string())
}

// ===== GENERATOR =====

/// Shader source generator with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ShaderGenerator {
    config: ShaderGenConfig,
}

impl ShaderGenerator {
    /// # Errors
    ///
    /// `InitializationFailed` if a configured name is not a GLSL identifier,
    /// the version line is malformed or the fill value is not finite.
    pub fn new(config: ShaderGenConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ShaderGenConfig {
        &self.config
    }

    /// Visualization shader: one `switch` case per attribute
    ///
    /// # Errors
    ///
    /// `EmptyAttributeList` or `InvalidAttribute`, before any text is built.
    pub fn vertex_attribute_shader(&self, attributes: &[AttributeDescriptor]) -> Result<GeneratedShader> {
        validate_attributes(attributes)?;
        let mut names = Names::new(&self.config);
        for uniform in [&self.config.matrix_uniform, &self.config.selector_uniform, &self.config.fragment_output] {
            names.claim(uniform.clone(), invalid_attribute)?;
        }
        names.claim_attributes(attributes)?;

        let vertex = self.vertex_stage(attributes, None);

        let config = &self.config;
        let mut fragment = Source::default();
        fragment.line(0, &config.version);
        fragment.blank();
        for attribute in attributes {
            fragment.line(0, &format!(
                "{}in {} {};",
                interpolation(attribute), glsl_type_name(attribute), config.output(&attribute.name)
            ));
        }
        fragment.blank();
        fragment.line(0, &format!("uniform int {};", config.selector_uniform));
        fragment.blank();
        fragment.line(0, &format!("out vec4 {};", config.fragment_output));
        fragment.blank();

        let cases: Vec<String> = attributes
            .iter()
            .map(|attribute| {
                let mut value = widen(
                    &config.output(&attribute.name),
                    attribute.components,
                    attribute.is_integer(),
                    3,
                    config.fill,
                );
                if attribute.display.contains(AttributeDisplay::NORMALIZE) {
                    value = format!("normalize({})", value);
                }
                if attribute.display.contains(AttributeDisplay::REMAP_SIGNED) {
                    value = format!("{} * 0.5 + 0.5", value);
                }
                value
            })
            .collect();
        self.selector_main(&mut fragment, &cases);

        Ok(GeneratedShader { vertex, fragment: fragment.text })
    }

    /// Texture shader: one `switch` case per texture
    ///
    /// # Errors
    ///
    /// - `EmptyAttributeList` / `InvalidAttribute` as for `vertex_attribute_shader`
    /// - `InvalidTexture` for an empty texture list or a bad / duplicate sampler name
    /// - `MissingAttributeUsage` when no attribute carries the usage a lookup
    ///   needs: `position` always, `texcoord0` for texcoord lookups, `normal`
    ///   for sphere-map and reflection lookups
    pub fn texture_shader(
        &self,
        textures: &[TextureDescriptor],
        attributes: &[AttributeDescriptor],
    ) -> Result<GeneratedShader> {
        validate_attributes(attributes)?;
        if textures.is_empty() {
            return Err(invalid_texture("at least one texture descriptor is required".to_string()));
        }

        let config = &self.config;
        let position = find_usage(attributes, AttributeUsage::Position).ok_or_else(|| {
            missing_usage(AttributeUsage::Position, "the clip-space transform of a texture shader".to_string())
        })?;
        let mut texcoord = None;
        let mut normal = None;
        for texture in textures {
            match texture.uv_source {
                UvSource::TexCoord if texcoord.is_none() => {
                    texcoord = Some(find_usage(attributes, AttributeUsage::TexCoord(0)).ok_or_else(|| {
                        missing_usage(AttributeUsage::TexCoord(0), format!("texture '{}' (texcoord lookup)", texture.name))
                    })?);
                }
                UvSource::SphereMap | UvSource::ReflectionCube if normal.is_none() => {
                    let lookup = if texture.uv_source == UvSource::SphereMap { "sphere map" } else { "reflection cube map" };
                    normal = Some(find_usage(attributes, AttributeUsage::Normal).ok_or_else(|| {
                        missing_usage(AttributeUsage::Normal, format!("texture '{}' ({})", texture.name, lookup))
                    })?);
                }
                _ => {}
            }
        }
        let view_space = normal.is_some();

        let mut names = Names::new(config);
        for uniform in [&config.matrix_uniform, &config.selector_uniform, &config.fragment_output] {
            names.claim(uniform.clone(), invalid_attribute)?;
        }
        if view_space {
            names.claim(config.view_matrix_uniform.clone(), invalid_attribute)?;
            names.claim(config.view_normal(), invalid_attribute)?;
            names.claim(config.view_position(), invalid_attribute)?;
        }
        names.claim_attributes(attributes)?;
        for texture in textures {
            if !is_identifier(&texture.name) {
                return Err(invalid_texture(format!("'{}' is not a valid GLSL identifier", texture.name)));
            }
            names.claim(texture.name.clone(), invalid_texture)?;
        }

        let vertex = self.vertex_stage(attributes, normal.map(|normal| (position, normal)));

        let mut fragment = Source::default();
        fragment.line(0, &config.version);
        fragment.blank();
        if let Some(texcoord) = texcoord {
            fragment.line(0, &format!(
                "{}in {} {};",
                interpolation(texcoord), glsl_type_name(texcoord), config.output(&texcoord.name)
            ));
        }
        if view_space {
            fragment.line(0, &format!("in vec3 {};", config.view_normal()));
            fragment.line(0, &format!("in vec3 {};", config.view_position()));
        }
        fragment.blank();
        fragment.line(0, &format!("uniform int {};", config.selector_uniform));
        for texture in textures {
            fragment.line(0, &format!("uniform {} {};", texture.uv_source.sampler_type(), texture.name));
        }
        fragment.blank();
        fragment.line(0, &format!("out vec4 {};", config.fragment_output));
        fragment.blank();

        let cases: Vec<String> = textures
            .iter()
            .map(|texture| {
                let coordinate = match (texture.uv_source, texcoord) {
                    (UvSource::TexCoord, Some(texcoord)) => widen(
                        &config.output(&texcoord.name),
                        texcoord.components,
                        texcoord.is_integer(),
                        2,
                        config.fill,
                    ),
                    (UvSource::SphereMap, _) => format!("normalize({}).xy * 0.5 + 0.5", config.view_normal()),
                    (UvSource::ReflectionCube, _) => format!(
                        "reflect(normalize({}), normalize({}))",
                        config.view_position(), config.view_normal()
                    ),
                    // texcoord is always resolved for TexCoord lookups above
                    (UvSource::TexCoord, None) => "vec2(0.0)".to_string(),
                };
                format!("texture({}, {}).{}", texture.name, coordinate, texture.swizzle.glsl())
            })
            .collect();
        self.selector_main(&mut fragment, &cases);

        Ok(GeneratedShader { vertex, fragment: fragment.text })
    }

    /// Inputs, outputs, transform uniform and pass-through body
    ///
    /// With `view` (position and normal attributes), also writes the
    /// view-space normal and position used by sphere-map and reflection
    /// lookups.
    fn vertex_stage(
        &self,
        attributes: &[AttributeDescriptor],
        view: Option<(&AttributeDescriptor, &AttributeDescriptor)>,
    ) -> String {
        let config = &self.config;
        let mut source = self.vertex_header(attributes, view.is_some());
        source.line(0, "void main()");
        source.line(0, "{");
        for attribute in attributes {
            source.line(1, &format!("{} = {};", config.output(&attribute.name), attribute.name));
        }
        if let Some((position, normal)) = view {
            let normal_value = widen(&normal.name, normal.components, normal.is_integer(), 3, 0.0);
            let position_value = widen(&position.name, position.components, position.is_integer(), 4, config.fill);
            source.line(1, &format!(
                "{} = mat3({}) * {};", config.view_normal(), config.view_matrix_uniform, normal_value
            ));
            source.line(1, &format!(
                "{} = ({} * {}).xyz;", config.view_position(), config.view_matrix_uniform, position_value
            ));
        }
        source.line(1, &self.clip_position(attributes));
        source.line(0, "}");
        source.text
    }

    fn vertex_header(&self, attributes: &[AttributeDescriptor], view_space: bool) -> Source {
        let config = &self.config;
        let mut source = Source::default();
        source.line(0, &config.version);
        source.blank();
        for attribute in attributes {
            source.line(0, &format!("in {} {};", glsl_type_name(attribute), attribute.name));
        }
        source.blank();
        source.line(0, &format!("uniform mat4 {};", config.matrix_uniform));
        if view_space {
            source.line(0, &format!("uniform mat4 {};", config.view_matrix_uniform));
        }
        source.blank();
        for attribute in attributes {
            source.line(0, &format!(
                "{}out {} {};",
                interpolation(attribute), glsl_type_name(attribute), config.output(&attribute.name)
            ));
        }
        if view_space {
            source.line(0, &format!("out vec3 {};", config.view_normal()));
            source.line(0, &format!("out vec3 {};", config.view_position()));
        }
        source.blank();
        source
    }

    fn clip_position(&self, attributes: &[AttributeDescriptor]) -> String {
        let config = &self.config;
        // validate_attributes guarantees a non-empty list
        let position = match position_attribute(attributes) {
            Some(attribute) => widen(&attribute.name, attribute.components, attribute.is_integer(), 4, config.fill),
            None => format!("vec4(0.0, 0.0, 0.0, {})", float_literal(config.fill)),
        };
        format!("gl_Position = {} * {};", config.matrix_uniform, position)
    }

    /// Output reset to opaque black, then one `case` per value
    fn selector_main(&self, source: &mut Source, cases: &[String]) {
        let config = &self.config;
        source.line(0, "void main()");
        source.line(0, "{");
        source.line(1, &format!("{} = vec4(0.0, 0.0, 0.0, 1.0);", config.fragment_output));
        source.line(1, &format!("switch ({})", config.selector_uniform));
        source.line(1, "{");
        for (index, value) in cases.iter().enumerate() {
            source.line(2, &format!("case {}:", index));
            source.line(3, &format!("{}.rgb = {};", config.fragment_output, value));
            source.line(3, "break;");
        }
        source.line(1, "}");
        source.line(0, "}");
    }
}

// ===== FREE FUNCTIONS =====

/// Visualization shader with the default configuration
pub fn generate_vertex_attribute_shader(attributes: &[AttributeDescriptor]) -> Result<GeneratedShader> {
    ShaderGenerator::default().vertex_attribute_shader(attributes)
}

/// Texture shader with the default configuration
pub fn generate_texture_shader(
    textures: &[TextureDescriptor],
    attributes: &[AttributeDescriptor],
) -> Result<GeneratedShader> {
    ShaderGenerator::default().texture_shader(textures, attributes)
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
