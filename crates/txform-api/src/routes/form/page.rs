//! Form page rendering - full page and HTML fragments

use crate::AppState;
use txform_core::{Category, ResultView, RowId, TransactionType, ROW_FIELD};
use txform_utils::escape_html;
use uuid::Uuid;

/// Full page with a fresh form session
pub async fn page_form(state: axum::extract::State<AppState>) -> axum::response::Html<String> {
    let now = chrono::Utc::now();
    let session_id = {
        let mut sessions = state.sessions.write().await;
        let removed = sessions.prune_expired(now);
        if removed > 0 {
            log::debug!("Pruned {} idle form sessions", removed);
        }
        sessions.create(now)
    };
    log::debug!("Opened form session {}", session_id);

    let content = render_form(session_id);
    axum::response::Html(crate::base_html("Transaction Calculator", &content))
}

/// Form body: parameters, empty transaction container, hidden result region
pub fn render_form(session_id: Uuid) -> String {
    format!(
        r#"<main class='max-w-2xl mx-auto p-6'>
    <h1 class='text-2xl font-bold mb-6'>Transaction Calculator</h1>
    <form id='transactionForm' class='bg-white rounded-xl shadow-sm p-6 space-y-4'
          hx-post='/sessions/{id}/submit' hx-target='#result' hx-swap='outerHTML'>
        <div id='transactionFields' class='space-y-4'></div>
        <button type='button' id='addTransactionButton'
                class='px-4 py-2 text-sm text-indigo-600 border border-indigo-200 rounded-lg hover:bg-indigo-50'
                hx-post='/sessions/{id}/rows' hx-target='#transactionFields' hx-swap='beforeend'>Add Transaction</button>
        <div>
            <label for='years' class='block text-sm font-medium text-gray-700 mb-1'>Number of Years:</label>
            <input type='number' id='years' name='years' required class='w-full px-3 py-2 border rounded-lg'>
        </div>
        <div>
            <label for='interestRate' class='block text-sm font-medium text-gray-700 mb-1'>Interest Rate (%):</label>
            <input type='number' step='any' id='interestRate' name='interestRate' required class='w-full px-3 py-2 border rounded-lg'>
        </div>
        <div>
            <label for='vatRate' class='block text-sm font-medium text-gray-700 mb-1'>VAT Rate (%):</label>
            <input type='number' step='any' id='vatRate' name='vatRate' required class='w-full px-3 py-2 border rounded-lg'>
        </div>
        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Calculate</button>
    </form>
    {result}
</main>"#,
        id = session_id,
        result = render_result(None),
    )
}

/// One transaction group. The hidden `row` field comes first so the submitted
/// fields can be grouped back into rows.
pub fn render_row(row: RowId, currency_label: &str) -> String {
    let currency = escape_html(currency_label);

    let type_options: String = TransactionType::ALL
        .iter()
        .map(|t| format!("<option value='{}'>{}</option>", t, t.label()))
        .collect();
    let category_options: String = Category::ALL
        .iter()
        .map(|c| format!("<option value='{}'>{}</option>", c, c.label()))
        .collect();

    format!(
        r#"<div class='transaction border rounded-lg p-4 bg-gray-50' id='transaction{n}'>
    <input type='hidden' name='{row_field}' value='{n}'>
    <h3 class='font-semibold mb-2'>Transaction {n}</h3>
    <label for='amount{n}' class='block text-sm text-gray-700'>Amount ({currency}):</label>
    <input type='number' step='any' id='amount{n}' name='amount' required class='w-full px-3 py-2 border rounded-lg mb-2'>
    <label for='vat{n}' class='block text-sm text-gray-700'>VAT ({currency}):</label>
    <input type='number' step='any' id='vat{n}' name='vat' required class='w-full px-3 py-2 border rounded-lg mb-2'>
    <label for='type{n}' class='block text-sm text-gray-700'>Type:</label>
    <select id='type{n}' name='type' required class='w-full px-3 py-2 border rounded-lg mb-2'>{type_options}</select>
    <label for='category{n}' class='block text-sm text-gray-700'>Category:</label>
    <select id='category{n}' name='category' required class='w-full px-3 py-2 border rounded-lg'>{category_options}</select>
</div>"#,
        n = row,
        row_field = ROW_FIELD,
        currency = currency,
        type_options = type_options,
        category_options = category_options,
    )
}

/// Result region; hidden until a summary is available
pub fn render_result(view: Option<&ResultView>) -> String {
    let (display, net, final_balance, items) = match view {
        Some(view) => (
            "block",
            escape_html(&view.net_balance),
            escape_html(&view.final_balance),
            view.category_items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect::<String>(),
        ),
        None => ("none", String::new(), String::new(), String::new()),
    };

    format!(
        r#"<div id='result' class='bg-white rounded-xl shadow-sm p-6 mt-6' style='display:{display}'>
    <h2 class='text-lg font-semibold mb-4'>Results</h2>
    <p>Net Balance Before Interest: <span id='net_balance' class='font-medium'>{net}</span></p>
    <p>Final Balance With Interest: <span id='final_balance' class='font-medium'>{final_balance}</span></p>
    <h3 class='font-semibold mt-4 mb-2'>Category Breakdown</h3>
    <ul id='category_breakdown' class='list-disc pl-6'>{items}</ul>
</div>"#,
        display = display,
        net = net,
        final_balance = final_balance,
        items = items,
    )
}
