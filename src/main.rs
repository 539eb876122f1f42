use std::env;
use std::path::{Path, PathBuf};

use bannerforge::{
    logger, AspectRatio, BannerSession, EditFilter, GeminiClient, GeminiConfig,
};

struct Args {
    prompt: String,
    aspect_ratio: AspectRatio,
    deep_research: bool,
    youtube_link: Option<String>,
    person_file: Option<PathBuf>,
    edit_instruction: Option<String>,
    filter: Option<EditFilter>,
    output: Option<PathBuf>,
}

fn usage() -> ! {
    eprintln!(
        "usage: bannerforge [--ratio 16:9|9:16|1:1|4:3|3:4] [--deep-research] \
         [--youtube URL] [--person FILE] [--edit INSTRUCTION] \
         [--filter vintage|noir|vibrant|cinematic] [--out FILE] PROMPT"
    );
    std::process::exit(2);
}

fn parse_filter(name: &str) -> Option<EditFilter> {
    EditFilter::all()
        .into_iter()
        .find(|f| f.name().eq_ignore_ascii_case(name))
}

fn parse_args() -> Args {
    let mut args = Args {
        prompt: String::new(),
        aspect_ratio: AspectRatio::default(),
        deep_research: false,
        youtube_link: None,
        person_file: None,
        edit_instruction: None,
        filter: None,
        output: None,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ratio" => {
                let value = iter.next().unwrap_or_else(|| usage());
                args.aspect_ratio = value.parse().unwrap_or_else(|_| usage());
            }
            "--deep-research" => args.deep_research = true,
            "--youtube" => args.youtube_link = Some(iter.next().unwrap_or_else(|| usage())),
            "--person" => args.person_file = Some(PathBuf::from(iter.next().unwrap_or_else(|| usage()))),
            "--edit" => args.edit_instruction = Some(iter.next().unwrap_or_else(|| usage())),
            "--filter" => {
                let value = iter.next().unwrap_or_else(|| usage());
                args.filter = Some(parse_filter(&value).unwrap_or_else(|| usage()));
            }
            "--out" => args.output = Some(PathBuf::from(iter.next().unwrap_or_else(|| usage()))),
            "--help" | "-h" => usage(),
            other if args.prompt.is_empty() => args.prompt = other.to_string(),
            _ => usage(),
        }
    }

    if args.prompt.is_empty() {
        usage();
    }
    args
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Info),
    )?;

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let args = parse_args();

    log::info!("🔍 Checking environment...");
    match env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            log::info!("✅ GEMINI_API_KEY found");
            log::debug!("API key starts with: {}...", &key[..5.min(key.len())]);
        }
        _ => {
            log::error!("❌ GEMINI_API_KEY is not set; generation will fail");
        }
    }

    let config = GeminiConfig::from_env();
    let client = match GeminiClient::new(config) {
        Ok(client) => {
            log::info!("✅ Generative client initialized");
            client
        }
        Err(e) => {
            log::error!("❌ {}", e.user_message());
            return Err(e.into());
        }
    };

    let mut session = BannerSession::new(client);
    session.set_prompt(&args.prompt);
    session.set_aspect_ratio(args.aspect_ratio);
    session.set_deep_research(args.deep_research);

    if let Some(link) = &args.youtube_link {
        log::info!("🖼️  Fetching reference thumbnail...");
        if let Err(e) = session.fetch_thumbnail(link).await {
            log::warn!("⚠️  {}", e.user_message());
        }
    }

    if let Some(path) = &args.person_file {
        log::info!("🧑 Loading person image from {}", path.display());
        if let Err(e) = session.load_person_image(path).await {
            log::warn!("⚠️  {}", e.user_message());
        }
    }

    log::info!(
        "🎨 Generating {} banner{}...",
        args.aspect_ratio.value(),
        if args.deep_research {
            " with deep research"
        } else {
            ""
        }
    );
    {
        let _timer = logger::timer("generate-banner");
        if let Err(e) = session.generate().await {
            log::error!("❌ {}", e.user_message());
            return Err(e.into());
        }
    }

    if let Some(filter) = args.filter {
        log::info!("🪄 Applying {} filter...", filter.name());
        if let Err(e) = session.apply_filter(filter).await {
            log::error!("❌ {}", e.user_message());
        }
    }

    if let Some(instruction) = &args.edit_instruction {
        log::info!("✏️  Applying edit: {}", instruction);
        if let Err(e) = session.edit(instruction).await {
            log::error!("❌ {}", e.user_message());
        }
    }

    let output = args
        .output
        .unwrap_or_else(|| Path::new(&session.download_file_name()).to_path_buf());
    session.save_banner(&output).await?;
    log::info!("💾 Banner saved to {}", output.display());

    Ok(())
}
