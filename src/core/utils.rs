/// 生成下一个请求 ID
pub fn next_id(id: &mut u64) -> u64 {
    let out = *id;
    *id = id.wrapping_add(1).max(1);
    out
}
