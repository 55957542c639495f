use std::collections::HashMap;

use crate::lighting::Light;

use super::error::UniformError;
use super::uniform::{Uniform, UniformValue};

/// A texture that knows which sampler slot it binds to.
pub trait TextureSlot {
    fn slot(&self) -> u32;
}

/// GPU-side half of a shader program.
///
/// Implementations own the compiled program; [`ShaderProgram`] layers name
/// caching and ordered application on top.
pub trait ProgramBackend {
    /// Resolved handle of one uniform.
    type Location: Copy;
    type Texture: TextureSlot;

    /// Looks `name` up in the compiled program.
    fn uniform_location(&self, name: &str) -> Option<Self::Location>;

    /// Uploads one value. Fails with [`UniformError::TypeMismatch`] when the
    /// slot cannot hold the value kind.
    fn upload(&mut self, name: &str, location: Self::Location, value: &UniformValue) -> Result<(), UniformError>;

    /// Makes `texture` the active texture of its slot.
    fn bind_texture(&mut self, texture: &Self::Texture) -> Result<(), UniformError>;
}

/// A compiled program plus its uniform location cache.
///
/// Move-only; the backend program is released when this is dropped.
pub struct ShaderProgram<B: ProgramBackend> {
    backend: B,
    locations: HashMap<String, B::Location>,
}

impl<B: ProgramBackend> ShaderProgram<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            locations: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Resolves `name`, asking the backend only on the first lookup.
    ///
    /// Missing names are not cached.
    pub fn uniform_location(&mut self, name: &str) -> Result<B::Location, UniformError> {
        if let Some(location) = self.locations.get(name) {
            return Ok(*location);
        }

        let location = self
            .backend
            .uniform_location(name)
            .ok_or_else(|| UniformError::NotFound { name: name.to_owned() })?;

        self.locations.insert(name.to_owned(), location);
        Ok(location)
    }

    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), UniformError> {
        let location = self.uniform_location(name)?;
        self.backend.upload(name, location, &value.into())
    }

    /// Applies `uniforms` in order and stops at the first failure.
    ///
    /// Values uploaded before the failure stay uploaded.
    pub fn set_uniforms(&mut self, uniforms: &[Uniform]) -> Result<(), UniformError> {
        for uniform in uniforms {
            let location = self.uniform_location(&uniform.name)?;
            self.backend.upload(&uniform.name, location, &uniform.value)?;
        }
        Ok(())
    }

    /// Binds each texture to its slot, then sets each sampler uniform to
    /// that slot number.
    pub fn set_textures(&mut self, textures: &[(&str, &B::Texture)]) -> Result<(), UniformError> {
        for (_, texture) in textures {
            self.backend.bind_texture(texture)?;
        }

        let slots: Vec<Uniform> = textures
            .iter()
            .map(|(name, texture)| Uniform::new(*name, UniformValue::Int(texture.slot() as i32)))
            .collect();

        self.set_uniforms(&slots)
    }

    /// Uploads every field of every light as `{array}[i].{field}`, then sets
    /// `count_name` to the number of lights.
    pub fn set_lights(&mut self, array: &str, count_name: &str, lights: &[Light]) -> Result<(), UniformError> {
        let mut uniforms: Vec<Uniform> = lights
            .iter()
            .enumerate()
            .flat_map(|(i, light)| light.uniforms(&format!("{array}[{i}]")))
            .collect();
        uniforms.push(Uniform::new(count_name, UniformValue::Int(lights.len() as i32)));

        self.set_uniforms(&uniforms)
    }
}
