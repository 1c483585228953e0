//! Render job configuration, read from a document's `renderer` object.

use std::path::PathBuf;

use serde_json::{json, Value};

use crate::scene::{json, SceneError};

#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    pub output_file: PathBuf,
    // empty when no HDR image should be written
    pub hdr_output_file: PathBuf,
    pub overwrite_output_files: bool,
    pub adaptive_sampling: bool,
    pub enable_resume_render: bool,
    pub stratified_sampler: bool,
    pub spp: u32,
    pub spp_step: u32,
    // seconds between checkpoints, 0 disables checkpointing
    pub checkpoint_interval: u32,
    // seconds, 0 renders until `spp` is reached
    pub timeout: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        RendererSettings {
            output_file: PathBuf::from("render.png"),
            hdr_output_file: PathBuf::new(),
            overwrite_output_files: true,
            adaptive_sampling: true,
            enable_resume_render: false,
            stratified_sampler: true,
            spp: 32,
            spp_step: 16,
            checkpoint_interval: 0,
            timeout: 0,
        }
    }
}

impl RendererSettings {
    /// Overwrites the settings present in `value`, keeping the others
    pub fn from_json(&mut self, value: &Value) -> Result<(), SceneError> {
        let mut output_file = String::new();
        if json::read(value, "output_file", &mut output_file)? {
            self.output_file = output_file.into();
        }
        let mut hdr_output_file = String::new();
        if json::read(value, "hdr_output_file", &mut hdr_output_file)? {
            self.hdr_output_file = hdr_output_file.into();
        }
        json::read(value, "overwrite_output_files", &mut self.overwrite_output_files)?;
        json::read(value, "adaptive_sampling", &mut self.adaptive_sampling)?;
        json::read(value, "enable_resume_render", &mut self.enable_resume_render)?;
        json::read(value, "stratified_sampler", &mut self.stratified_sampler)?;
        json::read(value, "spp", &mut self.spp)?;
        json::read(value, "spp_step", &mut self.spp_step)?;
        json::read(value, "checkpoint_interval", &mut self.checkpoint_interval)?;
        json::read(value, "timeout", &mut self.timeout)?;

        if self.spp_step == 0 {
            return Err(SceneError::invalid("spp_step", "a positive integer"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "output_file": self.output_file.to_string_lossy(),
            "hdr_output_file": self.hdr_output_file.to_string_lossy(),
            "overwrite_output_files": self.overwrite_output_files,
            "adaptive_sampling": self.adaptive_sampling,
            "enable_resume_render": self.enable_resume_render,
            "stratified_sampler": self.stratified_sampler,
            "spp": self.spp,
            "spp_step": self.spp_step,
            "checkpoint_interval": self.checkpoint_interval,
            "timeout": self.timeout,
        })
    }
}
