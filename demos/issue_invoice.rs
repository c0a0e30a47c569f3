use rust_ezpay_sdk::{
    error::EzpayResult,
    ezpay::{EzpayConfigBuilder, EzpaySDK},
    model::{
        buyer::{Buyer, InvoiceRecipient},
        line_item::LineItems,
    },
    request::{
        invoice_issue_request::InvoiceIssueRequest, invoice_search_request::InvoiceSearchRequest,
    },
    tax::TaxMode,
};

// EZPAY_MERCHANT_ID=... EZPAY_KEY=... EZPAY_IV=... cargo run --example issue_invoice
fn main() -> EzpayResult<()> {
    env_logger::init();

    let sdk = EzpaySDK::new(EzpayConfigBuilder::from_env()?.build()?);

    let buyer = Buyer::new("王小明")
        .with_email("test@example.com")
        .with_recipient(InvoiceRecipient::from_optional(None, Some("/ABC+123")));

    let items = LineItems::from_parallel(
        &["年费方案", "加购空间"],
        &[1, 2],
        &["式", "组"],
        &[1000, 25],
    )?;

    let request = InvoiceIssueRequest::new("DEMO0001", buyer, items)
        .with_tax_rate(5)
        .with_tax_mode(TaxMode::Inclusive);

    let issued = sdk.issue_invoice(&request)?;
    println!("{:?}", issued);

    if issued.success {
        let invoice = issued.issued_invoice()?;
        let search = InvoiceSearchRequest::by_invoice(&invoice.invoice_number, &invoice.random_num);
        println!("{:?}", sdk.search_invoice(&search)?);
        println!("{:?}", sdk.void_invoice(&invoice.invoice_number, "demo")?);
    }

    Ok(())
}
