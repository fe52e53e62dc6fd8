pub mod alpha_composite;
pub mod api;
pub mod bilateral;
pub mod classifier;
pub mod edge_sampler;
pub mod edge_smoothing;
pub mod enhancement;
pub mod histogram;
pub mod mask_refine;
pub mod resample;
pub mod run_control;
pub mod segmentation;
pub mod settings;
pub mod sharpen;
pub mod tone;
