use clap::{Parser, Subcommand};
use payment_gateways::application::{
    build_manager, get_across_gateways, verify_across_gateways, GatewayManager, LookupOptions,
};
use payment_gateways::config::AppConfig;
use payment_gateways::domain::payment::{GetPaymentRequest, VerifyPaymentRequest};
use payment_gateways::ports::PaymentGateway;
use payment_gateways::telemetry::init_tracing;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured gateways, readiness and fallback order
    Status,

    /// Verify a payment by reference
    Verify(LookupArgs),

    /// Fetch a payment with authorization details
    Get(LookupArgs),
}

#[derive(clap::Args)]
struct LookupArgs {
    /// Payment reference
    reference: String,

    /// Ask only this gateway instead of scanning all ready gateways
    #[arg(long)]
    gateway: Option<String>,

    /// Stop scanning at the first gateway error
    #[arg(long)]
    stop_on_error: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let manager = build_manager(&config.gateways);

    match cli.command {
        Command::Status => print_status(&manager),
        Command::Verify(args) => verify(&manager, args).await?,
        Command::Get(args) => get(&manager, args).await?,
    }

    Ok(())
}

fn print_status(manager: &GatewayManager) {
    let ready = manager.get_ready_gateways();
    for name in manager.get_available_gateways() {
        println!(
            "{:<12} priority={:<4} ready={}",
            name,
            manager.priority_of(&name),
            ready.contains(&name)
        );
    }

    let order: Vec<String> = manager
        .fallback_order()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    println!("default:  {}", manager.default_gateway_name().unwrap_or("-"));
    println!("fallback: {}", if manager.is_fallback_enabled() { "enabled" } else { "disabled" });
    println!("order:    {}", order.join(" > "));
}

async fn verify(
    manager: &GatewayManager,
    args: LookupArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (gateway, response) = match args.gateway {
        Some(name) => {
            let response = manager
                .get_gateway(&name)?
                .verify_payment(VerifyPaymentRequest::new(&args.reference))
                .await?;
            (name, response)
        }
        None => {
            let found =
                verify_across_gateways(manager, &args.reference, options(args.stop_on_error))
                    .await?;
            (found.gateway, found.response)
        }
    };

    println!("gateway: {gateway}");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn get(
    manager: &GatewayManager,
    args: LookupArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (gateway, response) = match args.gateway {
        Some(name) => {
            let response = manager
                .get_gateway(&name)?
                .get_payment(GetPaymentRequest::new(&args.reference))
                .await?;
            (name, response)
        }
        None => {
            let found =
                get_across_gateways(manager, &args.reference, options(args.stop_on_error)).await?;
            (found.gateway, found.response)
        }
    };

    println!("gateway: {gateway}");
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn options(stop_on_error: bool) -> LookupOptions {
    LookupOptions { stop_on_error }
}
