//! System prompts sent to the model. Every prompt is a pure function of the
//! trip and the configured language, so identical inputs produce identical
//! prompt text (which is what the completion cache keys on).

use crate::config::Language;
use crate::models::spot::Spot;
use crate::models::trip::TripParameters;

pub const SPOT_COUNT: usize = 10;

pub fn spots_prompt(language: Language, destination: &str) -> String {
    match language {
        Language::English => format!(
            "You are an excellent travel planner. For a trip to \"{destination}\", list the \
             {SPOT_COUNT} sights most popular with visitors, each with a short description \
             (at most 15 words). Write them as bullet points in the form \"spot:description\". \
             Do not write anything else."
        ),
        Language::Japanese => format!(
            "あなたは優秀な旅行プランナーです。「{destination}」への旅行のために、観光客に人気のある\
             おすすめスポットを日本語で{SPOT_COUNT}個、各スポットに簡単な説明（15字以内）付きで教えてください。\
             ただし、箇条書きにし、「スポット:説明」という形で出力してください。また、余計なことは答えないでください。"
        ),
    }
}

pub fn schedule_prompt(
    language: Language,
    trip: &TripParameters,
    spots: &[Spot],
    day_cap: usize,
) -> String {
    let spot_names = spots
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let days = trip.day_count();

    match language {
        Language::English => format!(
            "You are an excellent travel planner.\n\
             Create a draft itinerary based on the following information.\n\
             Destination: {destination}\n\
             Period: {start} to {end} ({days} days)\n\
             Travelers: {travelers}\n\
             Recommended spots: {spot_names}\n\
             \n\
             Suggest concrete activities for the morning, afternoon and night of each day, \
             working the recommended spots into the plan wherever possible.\n\
             Use exactly this format for every day:\n\
             \n\
             Date:\n\
             Morning:\n\
             Afternoon:\n\
             Night:\n\
             \n\
             Generate at most {day_cap} days.",
            destination = trip.destination,
            start = trip.start_date.format("%B %-d, %Y"),
            end = trip.end_date.format("%B %-d, %Y"),
            travelers = trip.travelers,
        ),
        Language::Japanese => format!(
            "あなたは優秀な旅行プランナーです。\n\
             以下の情報に基づき、旅行のスケジュール案を作成してください。\n\
             目的地: {destination}\n\
             期間: {start} から {end} ({days}日間)\n\
             旅行者数: {travelers}人\n\
             おすすめスポット: {spot_names}\n\
             \n\
             各日の午前、午後、夜の活動を具体的に提案してください。おすすめスポットを積極的にスケジュールに組み込んでください。\n\
             以下のフォーマットで出力してください。\n\
             \n\
             日付:\n\
             午前:\n\
             午後:\n\
             夜:\n\
             \n\
             最大{day_cap}日間のスケジュールを生成してください。",
            destination = trip.destination,
            start = trip.start_date.format("%Y年%m月%d日"),
            end = trip.end_date.format("%Y年%m月%d日"),
            travelers = trip.travelers,
        ),
    }
}

const ENGLISH_PACKING_CATEGORIES: [&str; 6] = [
    "Clothing",
    "Toiletries",
    "Medicine & hygiene",
    "Valuables & documents",
    "Electronics",
    "Other",
];

const JAPANESE_PACKING_CATEGORIES: [&str; 6] = [
    "衣類",
    "洗面用具",
    "医薬品・衛生用品",
    "貴重品・書類",
    "電子機器",
    "その他",
];

pub fn packing_prompt(language: Language, trip: &TripParameters) -> String {
    let days = trip.day_count();
    let season = trip.season().label(language);
    let purpose = trip.purpose.label(language);

    match language {
        Language::English => format!(
            "You are a travel expert.\n\
             Generate a packing list for the following trip.\n\
             Destination: {destination}\n\
             Period: {start} to {end} ({days} days)\n\
             Season: {season}\n\
             Trip type: {purpose}\n\
             \n\
             Group concrete items as bullet points under these categories, \
             listing the items after each category header.\n\
             \n\
             {headers}\n\
             \n\
             Example:\n\
             Clothing:\n\
             - T-shirts x3\n\
             - Long trousers x2\n\
             - Light jacket x1",
            destination = trip.destination,
            start = trip.start_date.format("%B %-d, %Y"),
            end = trip.end_date.format("%B %-d, %Y"),
            headers = category_headers(&ENGLISH_PACKING_CATEGORIES),
        ),
        Language::Japanese => format!(
            "あなたは旅行の専門家です。\n\
             以下の情報に基づき、旅行の持ち物リストを日本語で生成してください。\n\
             目的地: {destination}\n\
             旅行期間: {start} から {end} ({days}日間)\n\
             季節: {season}\n\
             旅行タイプ: {purpose}\n\
             \n\
             以下のカテゴリに分けて、具体的な持ち物を箇条書きで提案してください。\n\
             各カテゴリの後に、持ち物を列挙してください。\n\
             \n\
             {headers}\n\
             \n\
             例:\n\
             衣類:\n\
             - Tシャツ 3枚\n\
             - 長ズボン 2枚\n\
             - 薄手のジャケット 1枚",
            destination = trip.destination,
            start = trip.start_date.format("%Y年%m月%d日"),
            end = trip.end_date.format("%Y年%m月%d日"),
            headers = category_headers(&JAPANESE_PACKING_CATEGORIES),
        ),
    }
}

fn category_headers(categories: &[&str]) -> String {
    categories
        .iter()
        .map(|c| format!("{}:", c))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leading system message of the chat assistant.
pub fn chat_system_prompt(
    language: Language,
    trip: &TripParameters,
    reference_urls: &[String],
) -> String {
    match language {
        Language::English => {
            let mut prompt = format!(
                "You are an excellent travel planner. Help plan this trip while following these conditions.\n\
                 - Home location: {home}\n\
                 - Destination: {destination}\n\
                 - Period: {start} to {end}\n\
                 - Budget: {budget}\n\
                 - Travelers: {travelers}\n",
                home = trip.home_location.as_deref().unwrap_or("not specified"),
                destination = trip.destination,
                start = trip.start_date,
                end = trip.end_date,
                budget = trip.budget,
                travelers = trip.travelers,
            );
            if !reference_urls.is_empty() {
                prompt.push_str(&format!(
                    "- Travel guide sites to rely on: {}\n",
                    reference_urls.join(", ")
                ));
            }
            prompt.push_str(&format!(
                "- If the user asks about anything unrelated to this trip, decline to answer. \
                 Questions about facilities near {}, such as restrooms or restaurants, \
                 are related and must be answered.",
                trip.destination
            ));
            prompt
        }
        Language::Japanese => {
            let mut prompt = format!(
                "あなたは優秀な旅行プランナーです。旅行を計画してください。ただし、以下の条件を守ってください。\n\
                 -居住地:{home}\n\
                 -目的地:{destination}\n\
                 -期間:{start}から{end}まで\n\
                 -予算:{budget}円\n\
                 -旅行者数:{travelers}人\n",
                home = trip.home_location.as_deref().unwrap_or("未設定"),
                destination = trip.destination,
                start = trip.start_date,
                end = trip.end_date,
                budget = trip.budget,
                travelers = trip.travelers,
            );
            if !reference_urls.is_empty() {
                prompt.push_str(&format!(
                    "-主に参考にする旅行まとめサイト:{}\n",
                    reference_urls.join("、")
                ));
            }
            prompt.push_str(&format!(
                "-この旅行に関係のないものが入力された場合、必ず回答するのを避けること。\
                 ですが、目的地:{} の周辺のトイレやレストランなどは答えてください。",
                trip.destination
            ));
            prompt
        }
    }
}
