//! HTML fixtures shaped like the federation pages.

pub const BASE: &str = "https://www.ffvbbeach.org/ffvbapp/resu/vbspo_calendrier.php";

pub fn competition_url(codent: &str, poule: &str) -> String {
    format!("{}?saison=2023/2024&codent={}&poule={}", BASE, codent, poule)
}

/// Match row with eleven data cells followed by the score sheet link cell.
pub fn match_row(id: &str, home: &str, away: &str) -> String {
    format!(
        concat!(
            r##"<tr bgcolor="#EEEEF8">"##,
            r#"<td class="c">{id}</td><td class="c">24/03/24</td><td class="c">20:00</td>"#,
            r#"<td class="c">{home}</td><td class="c">3</td><td class="c">{away}</td>"#,
            r#"<td class="c">1</td><td class="c">70:62</td><td class="c">25:20, 25:18, 20:25, 25:19</td>"#,
            r#"<td class="c"></td><td class="c">MARTIN Paul</td>"#,
            r#"<td class="c" align="center" title="../resu/vbspo_fdme.php?codmatch={id}">fdm</td>"#,
            r#"</tr>"#
        ),
        id = id,
        home = home,
        away = away
    )
}

/// Competition page: metadata table at body child 4, match table at body
/// child 7.
pub fn page(name: &str, rows: &str) -> String {
    format!(
        concat!(
            "<html><head><title>Calendrier</title></head><body>",
            "<div>logo</div><div>menu</div><br><div>saison</div>",
            "<table><tr><td>Championnat</td></tr><tr><td>{name}</td></tr></table>",
            "<br><div>poule</div>",
            "<table><tr><th>Jo</th><th>Date</th></tr>{rows}</table>",
            "</body></html>"
        ),
        name = name,
        rows = rows
    )
}

/// Club calendar linking to the given competition URLs.
pub fn calendar(urls: &[String]) -> String {
    let rows: String = urls
        .iter()
        .map(|url| format!("<tr><td onclick=\"window.open('{}')\">voir</td></tr>", url))
        .collect();
    format!("<html><body><table>{}</table></body></html>", rows)
}
