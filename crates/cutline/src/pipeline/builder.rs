use goods_kit_common::Rgb;
use image::RgbaImage;
use crate::{
    algorithms::{
        estimate_background_color, AlphaRemover, SmoothOffsetter, ColorDistanceRemover,
        HoleOptions, MooreTracer, SampledColorRemover,
    },
    params::DesignParams,
    pipeline::{BoardPipeline, PipelineSettings},
    traits::{BackgroundRemover, ContourTracer, MaskOffsetter},
};

/// Builder for board pipelines with a fluent API
pub struct BoardPipelineBuilder {
    remover: Option<Box<dyn BackgroundRemover>>,
    offsetter: Option<Box<dyn MaskOffsetter>>,
    tracer: Option<Box<dyn ContourTracer>>,
    settings: PipelineSettings,
}

impl BoardPipelineBuilder {
    pub fn new() -> Self {
        Self {
            remover: None,
            offsetter: None,
            tracer: None,
            settings: PipelineSettings::default(),
        }
    }

    /// Set the background remover (replaces any existing one)
    pub fn with_remover<R>(mut self, remover: R) -> Self
    where
        R: BackgroundRemover + 'static,
    {
        self.remover = Some(Box::new(remover));
        self
    }

    /// Set the mask offsetter used for both board and cutline
    pub fn with_offsetter<O>(mut self, offsetter: O) -> Self
    where
        O: MaskOffsetter + 'static,
    {
        self.offsetter = Some(Box::new(offsetter));
        self
    }

    /// Set the contour tracer used for every outline
    pub fn with_tracer<T>(mut self, tracer: T) -> Self
    where
        T: ContourTracer + 'static,
    {
        self.tracer = Some(Box::new(tracer));
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_border_px(mut self, px: f64) -> Self {
        self.settings.border_px = px;
        self
    }

    pub fn with_cut_offset_px(mut self, px: f64) -> Self {
        self.settings.cut_offset_px = px;
        self
    }

    pub fn with_margin_px(mut self, px: u32) -> Self {
        self.settings.margin_px = px;
        self
    }

    pub fn with_hole_options(mut self, holes: HoleOptions) -> Self {
        self.settings.holes = holes;
        self
    }

    pub fn with_snap_to_perimeter(mut self, snap: bool) -> Self {
        self.settings.snap_to_perimeter = snap;
        self
    }

    /// Configure every stage from user parameters.
    ///
    /// Transparent artwork trusts its alpha; otherwise the explicit sample
    /// color wins over one estimated from `image`'s corners.
    pub fn for_design(self, params: &DesignParams, image: &RgbaImage) -> Self {
        let builder = self
            .with_border_px(params.border_px())
            .with_cut_offset_px(params.cut_offset_px())
            .with_hole_options(params.hole_options())
            .with_snap_to_perimeter(params.snap_to_perimeter);

        if params.assume_transparent {
            builder.with_remover(AlphaRemover::default())
        } else {
            let sample: Rgb = params
                .sample_color
                .unwrap_or_else(|| estimate_background_color(image));
            builder.with_remover(ColorDistanceRemover::new(sample, params.threshold))
        }
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> BoardPipeline {
        let remover = self
            .remover
            .unwrap_or_else(|| Box::new(SampledColorRemover::default()));
        let offsetter = self
            .offsetter
            .unwrap_or_else(|| Box::new(SmoothOffsetter::default()));
        let tracer = self
            .tracer
            .unwrap_or_else(|| Box::new(MooreTracer::default()));

        BoardPipeline::new(remover, offsetter, tracer, self.settings)
    }
}

impl Default for BoardPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
