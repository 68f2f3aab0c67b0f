use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;

/// 把 URL 渲染成终端可显示的二维码（上下半块字符，一行两格）
pub fn render_qr(data: &str) -> Option<String> {
    let code = QrCode::new(data.as_bytes()).ok()?;
    Some(
        code.render::<Dense1x2>()
            .quiet_zone(true)
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_square_block() {
        let qr = render_qr("http://localhost:5173/submit").expect("qr");
        let lines: Vec<&str> = qr.lines().collect();
        assert!(lines.len() > 10);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }
}
