use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use inkframe::api;
use inkframe::models::{AppConfig, ImageRecord, Settings};
use inkframe::server;
use inkframe::services::RenderService;

#[derive(Parser)]
#[command(name = "inkframe")]
#[command(about = "Rotating photo frame server for color e-ink displays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and rotation scheduler (default)
    Serve,
    /// Render an image file to a display bitmap
    Render {
        /// Source image (any format the decoder understands)
        #[arg(short, long)]
        input: PathBuf,

        /// Output BMP file path
        #[arg(short, long)]
        output: PathBuf,

        /// Map each pixel to the nearest color without error diffusion
        #[arg(long)]
        no_dither: bool,

        /// Unsharp mask sigma (0 disables)
        #[arg(long)]
        sharpen: Option<f32>,

        /// Saturation multiplier
        #[arg(long)]
        saturation: Option<f32>,

        /// Contrast multiplier
        #[arg(long)]
        contrast: Option<f32>,

        /// Gamma
        #[arg(long)]
        gamma: Option<f32>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkframe API",
        description = "Rotating photo frame server for color e-ink displays",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::upload_image,
        api::current_image,
        api::current_bitmap,
        api::image_bitmap,
        api::get_schedule,
        api::list_images,
        api::list_favorites,
        api::add_favorite,
        api::remove_favorite,
        api::requeue_image,
        api::delete_image,
        api::get_settings,
        api::update_settings,
    ),
    components(schemas(ImageRecord, Settings, api::ScheduleResponse)),
    tags(
        (name = "Images", description = "Upload and display images"),
        (name = "Schedule", description = "Rotation timer"),
        (name = "Admin", description = "Pool administration and settings")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            no_dither,
            sharpen,
            saturation,
            contrast,
            gamma,
        }) => {
            let overrides = RenderOverrides {
                no_dither,
                sharpen,
                saturation,
                contrast,
                gamma,
            };
            run_render_command(&input, &output, overrides)
        }
        Some(Commands::Serve) | None => run_server().await,
    }
}

struct RenderOverrides {
    no_dither: bool,
    sharpen: Option<f32>,
    saturation: Option<f32>,
    contrast: Option<f32>,
    gamma: Option<f32>,
}

impl RenderOverrides {
    fn apply(&self, mut settings: Settings) -> Settings {
        if self.no_dither {
            settings.dithering_enabled = false;
        }
        if let Some(sigma) = self.sharpen {
            settings.sharpen_sigma = sigma;
        }
        if let Some(factor) = self.saturation {
            settings.saturation_multiplier = factor;
        }
        if let Some(factor) = self.contrast {
            settings.contrast_multiplier = factor;
        }
        if let Some(gamma) = self.gamma {
            settings.gamma = gamma;
        }
        settings
    }
}

/// Render one file to BMP (no server needed)
fn run_render_command(
    input: &PathBuf,
    output: &PathBuf,
    overrides: RenderOverrides,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkframe=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::from_env();
    let settings = overrides.apply(config.settings.clone());
    settings.validate()?;

    let renderer = RenderService::new(&config.display)?;
    let bytes = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    let bitmap = renderer.render_blocking(&bytes, &settings)?;

    std::fs::write(output, &bitmap)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!(
        "Rendered {} -> {} ({}x{}, {} bytes)",
        input.display(),
        output.display(),
        renderer.width(),
        renderer.height(),
        bitmap.len()
    );

    Ok(())
}

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkframe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        bind_addr = %config.bind_addr,
        state_file = %config.state_file.display(),
        width = config.display.width,
        height = config.display.height,
        "Configuration resolved"
    );

    // Create application state using shared server module
    let state = server::create_app_state(&config)?;

    // Resume the rotation timer from persisted state
    state.scheduler.clone().spawn();

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Inkframe server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
