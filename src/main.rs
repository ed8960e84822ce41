use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use address_valuation::config::{ServiceConfig, WidgetConfig, DEFAULT_BASE_URL};
use address_valuation::widget::runtime::{AddressWidget, InteractionHub, PointerEvent, Region};
use address_valuation::widget::services::{HttpServiceClient, SuggestionFetcher, ValuationFetcher};
use address_valuation::widget::session::RequestPhase;
use address_valuation::widget::types::SuggestionResult;
use address_valuation::widget::domain::ValuationRecord;

/// Screen area the interactive input pretends to occupy.
const INPUT_REGION: (f64, f64, f64, f64) = (0.0, 0.0, 400.0, 40.0);

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "VALUATION_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    #[arg(long, env = "VALUATION_TIMEOUT_SECS", default_value_t = 10, global = true)]
    timeout_secs: u64,

    #[arg(long, env = "AUTOCOMPLETE_DEBOUNCE_MS", default_value_t = 300, global = true)]
    debounce_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print address suggestions for a partial query
    Suggest { query: String },
    /// Request a valuation for a full address
    Estimate { address: String },
    /// Line-driven address input with live suggestions
    Interactive,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ServiceConfig {
        base_url: args.api_url.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
        ..ServiceConfig::default()
    };
    config.validate()?;
    let client = Arc::new(HttpServiceClient::new(config)?);

    match args.command {
        Command::Suggest { query } => run_suggest(client, &query).await,
        Command::Estimate { address } => run_estimate(client, &address).await,
        Command::Interactive => {
            let widget_config = WidgetConfig {
                debounce: Duration::from_millis(args.debounce_ms),
            };
            run_interactive(client, widget_config).await
        }
    }
}

async fn run_suggest(client: Arc<HttpServiceClient>, query: &str) -> Result<()> {
    match SuggestionFetcher::new(client).fetch(query).await {
        SuggestionResult::Ok(list) => {
            for (i, s) in list.iter().enumerate() {
                println!("{:>2}. {}", i, s);
            }
        }
        SuggestionResult::Empty => println!("(no suggestions)"),
        SuggestionResult::Error(detail) => anyhow::bail!("autocomplete failed: {}", detail),
    }
    Ok(())
}

async fn run_estimate(client: Arc<HttpServiceClient>, address: &str) -> Result<()> {
    let address = address.trim();
    if address.is_empty() {
        anyhow::bail!("address required");
    }
    let record = ValuationFetcher::new(client).fetch(address).await?;
    print_record(&record);
    Ok(())
}

async fn run_interactive(client: Arc<HttpServiceClient>, config: WidgetConfig) -> Result<()> {
    let hub = InteractionHub::new();
    let (x, y, w, h) = INPUT_REGION;

    let mut widget = AddressWidget::new(client.clone(), client, config);
    widget.mount(&hub, Region::new(x, y, w, h));

    println!("Type an address. Commands: /down /up /enter /pick N /focus /outside /submit /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = Snapshot::default();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => Some(line?),
            _ = widget.next_event() => None,
        };

        if let Some(line) = line {
            let Some(line) = line else { break };
            let cmd = line.trim().to_string();
            match cmd.as_str() {
                "/quit" => break,
                "/down" => widget.arrow_down(),
                "/up" => widget.arrow_up(),
                "/enter" => widget.enter(),
                "/focus" => widget.focus(),
                "/submit" => widget.submit(),
                "/outside" => {
                    hub.dispatch(PointerEvent::pointer_down(x + w + 1.0, y + h + 1.0));
                }
                pick if pick.starts_with("/pick") => {
                    match pick.trim_start_matches("/pick").trim().parse::<usize>() {
                        Ok(i) => widget.click(i),
                        Err(_) => println!("usage: /pick N"),
                    }
                }
                _ => widget.input(line),
            }
        }

        widget.pump();
        shown.refresh(&widget);
    }

    widget.unmount();
    Ok(())
}

/// What has already been printed, so only changes are echoed.
#[derive(Default)]
struct Snapshot {
    query: String,
    suggestions: Vec<String>,
    highlight: Option<usize>,
    phase: Option<RequestPhase>,
}

impl Snapshot {
    fn refresh(&mut self, widget: &AddressWidget) {
        let ctl = widget.controller();
        let session = widget.session();

        if ctl.query() != self.query {
            println!("> {}", ctl.query());
        }
        if ctl.suggestions() != self.suggestions.as_slice() || ctl.highlight() != self.highlight {
            for (i, s) in ctl.suggestions().iter().enumerate() {
                let marker = if ctl.highlight() == Some(i) { '*' } else { ' ' };
                println!(" {}{:>2}. {}", marker, i, s);
            }
        }
        if Some(session.phase()) != self.phase {
            match session.phase() {
                RequestPhase::Idle => {}
                RequestPhase::Loading => println!("Fetching estimate..."),
                RequestPhase::Success => {
                    if let Some(record) = session.record() {
                        print_record(record);
                    }
                    for (key, entry) in session.sale_history().iter() {
                        println!(
                            "  {}: {} {} {}",
                            key,
                            entry.event.as_deref().unwrap_or("-"),
                            entry.date.as_deref().unwrap_or("-"),
                            entry.price.map(|p| format!("{:.0}", p)).unwrap_or_else(|| "-".into()),
                        );
                    }
                    if let Some(date) = session.last_sale_date() {
                        println!("Last sale:      {}", date);
                    }
                }
                RequestPhase::Failed => {
                    println!("Error: {}", session.error().unwrap_or("unknown"));
                }
            }
        }

        self.query = ctl.query().to_string();
        self.suggestions = ctl.suggestions().to_vec();
        self.highlight = ctl.highlight();
        self.phase = Some(session.phase());
    }
}

fn print_record(record: &ValuationRecord) {
    println!("-----------------------------------");
    println!("Address:        {}", record.address);
    println!("Estimate:       {:.0} {}", record.estimated_value, record.currency);
    if let Some(t) = &record.property_type {
        println!("Property type:  {}", t);
    }
    if let Some(b) = record.bedrooms {
        println!("Bedrooms:       {}", b);
    }
    if let Some(b) = record.bathrooms {
        println!("Bathrooms:      {}", b);
    }
    if let Some(s) = record.square_footage {
        println!("Square footage: {}", s);
    }
    if let Some(y) = record.year_built {
        println!("Year built:     {}", y);
    }
    println!("-----------------------------------");
}
