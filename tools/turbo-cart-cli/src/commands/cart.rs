//! Cart commands: show, add, remove, update, clear.

use std::sync::Arc;

use anyhow::Result;
use dialoguer::Confirm;
use turbo_cart::{CartError, CartStore, RecordingSink};

use super::{AddArgs, ClearArgs, RemoveArgs, Reported, UpdateArgs};
use crate::context::Context;

/// Print the cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let (store, _) = open(ctx)?;
    ctx.output.cart(&store.cart());
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let (store, sink) = open(ctx)?;

    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.product_id));
    let result = store.add_item(args.product_id).await;
    spinner.finish_and_clear();

    finish(ctx, &sink, result)?;
    if let Some(item) = store.cart().get(args.product_id) {
        ctx.output
            .success(&format!("{} x{} in cart", item.name, item.amount));
    }
    ctx.output.cart(&store.cart());
    Ok(())
}

/// Remove a product's line.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let (store, sink) = open(ctx)?;

    let result = store.remove_item(args.product_id).await;
    finish(ctx, &sink, result)?;

    ctx.output
        .success(&format!("Removed product {}", args.product_id));
    ctx.output.cart(&store.cart());
    Ok(())
}

/// Set a product's amount.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let (store, sink) = open(ctx)?;

    if args.amount <= 0 {
        ctx.output
            .debug(&format!("Amount {} ignored", args.amount));
        ctx.output.cart(&store.cart());
        return Ok(());
    }

    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.product_id));
    let result = store.update_amount(args.product_id, args.amount).await;
    spinner.finish_and_clear();

    finish(ctx, &sink, result)?;
    ctx.output.success(&format!(
        "Product {} amount set to {}",
        args.product_id, args.amount
    ));
    ctx.output.cart(&store.cart());
    Ok(())
}

/// Empty the cart.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    let (store, sink) = open(ctx)?;
    let cart = store.cart();

    if cart.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", cart.item_count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let result = store.clear().await;
    finish(ctx, &sink, result)?;

    ctx.output.success("Cart cleared");
    ctx.output.cart(&store.cart());
    Ok(())
}

fn open(ctx: &Context) -> Result<(CartStore, Arc<RecordingSink>)> {
    let sink = Arc::new(RecordingSink::new());
    let store = ctx.open_store(sink.clone())?;
    ctx.output
        .debug(&format!("Cart storage: {}", ctx.storage_dir().display()));
    Ok((store, sink))
}

/// Show the notices an operation raised and turn its error into the
/// command's result.
fn finish(ctx: &Context, sink: &RecordingSink, result: Result<(), CartError>) -> Result<()> {
    let notices = sink.take();
    for notice in &notices {
        ctx.output.error(notice.message());
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if notices.is_empty() => Err(e.into()),
        Err(e) => {
            ctx.output.debug(&format!("{:#}", anyhow::Error::new(e)));
            Err(Reported.into())
        }
    }
}
