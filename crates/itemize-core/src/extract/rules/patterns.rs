//! Common regex patterns for invoice line-item extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Product codes
    pub static ref PREFIXED_NUMERIC_CODE: Regex = Regex::new(
        r"\b(\d{3}\s+[A-Z]{2,4})\b"
    ).unwrap();

    pub static ref SHORT_ALPHANUMERIC_CODE: Regex = Regex::new(
        r"\b([A-Z]{2,4}\d{2,8}[A-Z]?)\b"
    ).unwrap();

    pub static ref COMBINED_ENTRY_CODE: Regex = Regex::new(
        r"\b(D[A-Z]\d{4}[A-Z]?)\b"
    ).unwrap();

    pub static ref TEXT_LINE_CODE: Regex = Regex::new(
        r"^[A-Z]{2,}\d+"
    ).unwrap();

    pub static ref CODE_WITH_UPC: Regex = Regex::new(
        r"\b(D[A-Z]\d{4}[A-Z]?)\s+(\d{12})\b"
    ).unwrap();

    // UPC runs
    pub static ref UPC_RUN: Regex = Regex::new(
        r"\b(\d{12,13})\b"
    ).unwrap();

    pub static ref UPC_12: Regex = Regex::new(
        r"\b(\d{12})\b"
    ).unwrap();

    pub static ref UPC_ANY: Regex = Regex::new(
        r"\b\d{12,13}\b"
    ).unwrap();

    pub static ref TWELVE_DIGIT_RUN: Regex = Regex::new(
        r"\d{12}"
    ).unwrap();

    pub static ref UPC_LINE: Regex = Regex::new(
        r"^\d{12,13}$"
    ).unwrap();

    pub static ref UPC_12_LINE: Regex = Regex::new(
        r"^\d{12}$"
    ).unwrap();

    // Prices
    pub static ref PRICE_TOKEN: Regex = Regex::new(
        r"\b(\d+\.\d{2})\b"
    ).unwrap();

    pub static ref PRICE_ANY: Regex = Regex::new(
        r"\b\d+\.\d{2}\b"
    ).unwrap();

    pub static ref PRICE_LINE: Regex = Regex::new(
        r"^\d+\.\d{2}$"
    ).unwrap();

    pub static ref NON_PRICE_CHARS: Regex = Regex::new(
        r"[^0-9.\-]"
    ).unwrap();

    // Quantities
    pub static ref DECIMAL_QUANTITY: Regex = Regex::new(
        r"\b(\d+(?:\.\d+)?)\b"
    ).unwrap();

    pub static ref INTEGER_RUN: Regex = Regex::new(
        r"\b(\d+)\b"
    ).unwrap();

    // "shipped back uom" idioms with a captured shipped count
    pub static ref SHIPPED_LO_EACH: Regex = Regex::new(
        r"(?i)\b(\d+)\s+\d+\s+lo\s+each\b"
    ).unwrap();

    pub static ref SHIPPED_SET: Regex = Regex::new(
        r"(?i)\b(\d+)\s+\d+\s+Set\b"
    ).unwrap();

    pub static ref SHIPPED_EACH: Regex = Regex::new(
        r"(?i)\b(\d+)\s+\d+\s+each\b"
    ).unwrap();

    // Quantity idioms stripped out of descriptions
    pub static ref QTY_IDIOM_EACH: Regex = Regex::new(
        r"(?i)\b\d+\s+\d+\s+(?:lo\s+)?each\b"
    ).unwrap();

    pub static ref QTY_IDIOM_SET: Regex = Regex::new(
        r"(?i)\b\d+\s+\d+\s+Set\b"
    ).unwrap();

    // Shipped-quantity token guards
    pub static ref THREE_DIGIT_TOKEN: Regex = Regex::new(
        r"^\d{3}$"
    ).unwrap();

    pub static ref LETTER_CODE_TOKEN: Regex = Regex::new(
        r"^[A-Z]{2,4}$"
    ).unwrap();

    pub static ref INTEGER_TOKEN: Regex = Regex::new(
        r"^\d+$"
    ).unwrap();

    pub static ref TWO_DIGIT_TOKEN: Regex = Regex::new(
        r"^\d{2}$"
    ).unwrap();

    // Invoice and order headers
    pub static ref INVOICE_NUMBER_OCCURRENCE: Regex = Regex::new(
        r"(?i)Invoice\s*#\s*(\d+)"
    ).unwrap();

    pub static ref ISBN_PREFIXED: Regex = Regex::new(
        r"\b(978\d{10})\b"
    ).unwrap();

    pub static ref ORDER_NUMBER_HASH: Regex = Regex::new(
        r"(?i)Order\s*#\s*([A-Z0-9]+)"
    ).unwrap();

    pub static ref ORDER_NUMBER_LABEL: Regex = Regex::new(
        r"(?i)Order\s*Number\s*:?\s*([A-Z0-9]+)"
    ).unwrap();

    pub static ref ORDER_ID_LABEL: Regex = Regex::new(
        r"(?i)Order\s*ID\s*:?\s*([A-Z0-9]+)"
    ).unwrap();

    pub static ref ORDER_DATE_PLACED: Regex = Regex::new(
        r"(?i)placed\s+on\s+([A-Za-z]+ \d{1,2}, \d{4})"
    ).unwrap();

    pub static ref ORDER_DATE_LABEL: Regex = Regex::new(
        r"(?i)Order\s+Date\s*:?\s*([A-Za-z]+ \d{1,2}, \d{4})"
    ).unwrap();

    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)Date\s*:?\s*([A-Za-z]+ \d{1,2}, \d{4})"
    ).unwrap();

    // Purchase-order headers (HarperCollins layouts)
    pub static ref NS_ORDER: Regex = Regex::new(
        r"(?i)(NS\d+)"
    ).unwrap();

    pub static ref PO_NUMBER: Regex = Regex::new(
        r"(?i)PO\s*#\s*([A-Z]+\d+)"
    ).unwrap();

    pub static ref ORDER_HASH_ALPHA: Regex = Regex::new(
        r"(?i)Order\s*#\s*([A-Z]+\d+)"
    ).unwrap();

    pub static ref ORDER_DATE_SLASH: Regex = Regex::new(
        r"(?i)Order\s+Date:\s*(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    pub static ref DISCOUNT_PERCENT: Regex = Regex::new(
        r"(?i)Discount:\s*(\d+(?:\.\d+)?)%\s*OFF"
    ).unwrap();

    // Creative-Coop fallback headers; their layouts print these uppercased
    pub static ref CS_NUMBER: Regex = Regex::new(
        r"CS(\d+)"
    ).unwrap();

    pub static ref CC_ORDER_DATE: Regex = Regex::new(
        r"ORDER DATE:\s*(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    // OneHundred80 order dates
    pub static ref OH_ORDER_DATE: Regex = Regex::new(
        r"(?i)Order Date[:\s]+(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    pub static ref OH_DATE: Regex = Regex::new(
        r"(?i)Date[:\s]+(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    pub static ref SLASH_DATE: Regex = Regex::new(
        r"(\d{1,2}/\d{1,2}/\d{4})"
    ).unwrap();

    // Priced-row layouts (code, UPC, price, quantity, total on one line)
    pub static ref PRICED_TUPLE_HINT: Regex = Regex::new(
        r"\b([A-Z0-9]{3,10})\s+\d{12}\s+\$?\d+\.\d{2}"
    ).unwrap();

    pub static ref DATA_LINE_HINT: Regex = Regex::new(
        r"\b[A-Z0-9]{3,10}\s+\d{12}\s+\d+\.\d{2}"
    ).unwrap();

    pub static ref PRICED_TUPLE: Regex = Regex::new(
        r"\b([A-Z0-9]{3,10})\s+(\d{12})\s+(\d+\.\d{2})\s+(\d+)\s+(\d+\.\d{2})"
    ).unwrap();

    pub static ref SAME_LINE_DESC: Regex = Regex::new(
        r"^\s*(.+?)(?:\s+\d+\s+\d+\s+(?:each|lo|Set)|\s+TRF)"
    ).unwrap();

    pub static ref DESC_CODE_TAG: Regex = Regex::new(
        r"#([A-Z0-9]+)"
    ).unwrap();

    // Ordered/shipped/price runs in Creative-Coop item rows
    pub static ref CC_FULL_ROW: Regex = Regex::new(
        r"(?i)(\d+)\s+(\d+)\s+(?:lo\s+)?(?:each|Set)\s+(\d+\.\d{2})\s+(\d+\.\d{2})\s+(\d+\.\d{2})"
    ).unwrap();

    pub static ref CC_GAPPED_ROW: Regex = Regex::new(
        r"(?i)(\d+)\s+(\d+)\s+(?:lo\s+)?(?:each|Set)\s+(\d+\.\d{2}).*?(\d+\.\d{2})\s+(\d+\.\d{2})"
    ).unwrap();

    pub static ref CC_NUMBER_TOKEN: Regex = Regex::new(
        r"\b\d+(?:\.\d{1,2})?\b"
    ).unwrap();

    // Description phrase candidates, most structured first
    pub static ref DESC_SET_PREFIX: Regex = Regex::new(
        r#"(?i)(S/\d+\s+.{10,})"#
    ).unwrap();

    pub static ref DESC_DIMENSION: Regex = Regex::new(
        r#"(?i)(\d+(?:["'-]\d+)*["']?[LWH][^0-9\n]{10,})"#
    ).unwrap();

    pub static ref DESC_CAPITALIZED: Regex = Regex::new(
        r"(?i)([A-Z][^0-9\n]{15,})"
    ).unwrap();

    pub static ref DESC_QUOTED: Regex = Regex::new(
        r#"(?i)"([^"]+)""#
    ).unwrap();

    // Context description candidates around a code line
    pub static ref CTX_DIMENSION: Regex = Regex::new(
        r#"(?i)(\d+["'-]\d+["']?[LWH]?\s+[^\d\n]{15,})"#
    ).unwrap();

    pub static ref CTX_SET: Regex = Regex::new(
        r"(?i)(S/\d+\s+[^\d\n]{10,})"
    ).unwrap();

    pub static ref CTX_CAPITALIZED: Regex = Regex::new(
        r"(?i)([A-Z][a-z]+[^\d\n]{15,})"
    ).unwrap();

    // Backward description candidates before a code occurrence
    pub static ref BACK_LAST_LINE: Regex = Regex::new(
        r"([^\n]{15,})\s*$"
    ).unwrap();

    pub static ref BACK_DIMENSION: Regex = Regex::new(
        r#"(\d+["'-]\d+["']?[LWH]?\s+[^\n]{10,})"#
    ).unwrap();

    pub static ref BACK_SET: Regex = Regex::new(
        r"(S/\d+\s+[^\n]{10,})"
    ).unwrap();

    // Line guards
    pub static ref NUMERIC_ONLY_LINE: Regex = Regex::new(
        r"^[\d\s\.]+$"
    ).unwrap();

    pub static ref NUMERIC_DOTTED_LINE: Regex = Regex::new(
        r"^\d+[\d\s\.]*$"
    ).unwrap();

    pub static ref NUMERIC_DASH_LINE: Regex = Regex::new(
        r"^[\d\s\.\-]+$"
    ).unwrap();

    pub static ref NUMERIC_PRICE_LINE: Regex = Regex::new(
        r"^[\d\s\.\$]+$"
    ).unwrap();

    pub static ref LINE_OR_PIPE_SPLIT: Regex = Regex::new(
        r"[\n|]+"
    ).unwrap();

    // OneHundred80 description repair
    pub static ref DIM_TRIPLE: Regex = Regex::new(
        r#"(\d)(\d+)(\d)""#
    ).unwrap();

    pub static ref DIM_PAIR: Regex = Regex::new(
        r#"(\d+\.?\d*)"?\s+(\d+\.?\d*)""#
    ).unwrap();

    pub static ref HEADER_FRAGMENT: Regex = Regex::new(
        r"(?i)\b(?:Unit Price|Extended|Price|SKU|UPC|QTY|Order Items|Total Pieces)\b.*"
    ).unwrap();

    pub static ref HEADER_LINE_HINT: Regex = Regex::new(
        r"(?i)(?:Unit Price|Extended|Price|SKU|UPC|QTY)"
    ).unwrap();

    pub static ref DOUBLE_COMMA: Regex = Regex::new(
        r",\s*,"
    ).unwrap();

    pub static ref MULTI_WS: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    pub static ref TRAILING_PRICE: Regex = Regex::new(
        r"\s+\d+\.\d{2}$"
    ).unwrap();

    pub static ref TRAILING_INT: Regex = Regex::new(
        r"\s+\d+$"
    ).unwrap();
}
